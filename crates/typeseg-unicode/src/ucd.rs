//! Unicode Character Database property files
//!
//! The files share one line format:
//!
//! ```text
//! 0041..005A ; ALetter # 26 letters
//! 00AD       ; Format
//! ```
//!
//! Blank lines and `#` comments are skipped. Every property value must be
//! known to the caller; an unknown name or a malformed line fails the whole
//! file.

use typeseg_core::SetupError;

/// Sorted, non-overlapping code point ranges with a class each
#[derive(Debug, Clone)]
pub struct RangeTable<C> {
    ranges: Vec<(u32, u32, C)>,
    default: C,
}

impl<C: Copy + PartialEq> RangeTable<C> {
    /// Build from ranges in any order; adjacent ranges of one class merge
    ///
    /// Fails on overlapping ranges, naming `file`.
    pub fn from_ranges(
        file: &str,
        mut ranges: Vec<(u32, u32, C)>,
        default: C,
    ) -> Result<Self, SetupError> {
        ranges.sort_by_key(|&(lo, _, _)| lo);
        let mut merged: Vec<(u32, u32, C)> = Vec::with_capacity(ranges.len());
        for (lo, hi, class) in ranges {
            match merged.last_mut() {
                Some(last) if lo <= last.1 => {
                    return Err(SetupError::Malformed {
                        file: file.to_string(),
                        line: 0,
                        reason: format!("range {lo:04X}..{hi:04X} overlaps {:04X}..{:04X}", last.0, last.1),
                    });
                }
                Some(last) if last.1 + 1 == lo && last.2 == class => last.1 = hi,
                _ => merged.push((lo, hi, class)),
            }
        }
        Ok(Self {
            ranges: merged,
            default,
        })
    }

    /// Parse a property file; `resolve` maps value names to classes
    pub fn parse(
        file: &str,
        text: &str,
        default: C,
        resolve: impl Fn(&str) -> Option<C>,
    ) -> Result<Self, SetupError> {
        let ranges = parse_property_file(file, text, resolve)?;
        Self::from_ranges(file, ranges, default)
    }

    /// Class of `c`, or the default if no range holds it
    pub fn lookup(&self, c: char) -> C {
        let cp = c as u32;
        match self.ranges.binary_search_by(|&(lo, hi, _)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        }) {
            Ok(i) => self.ranges[i].2,
            Err(_) => self.default,
        }
    }

    /// Number of stored ranges after merging
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn default_class(&self) -> C {
        self.default
    }
}

/// Parse every data line of a property file into `(first, last, class)`
pub fn parse_property_file<C>(
    file: &str,
    text: &str,
    resolve: impl Fn(&str) -> Option<C>,
) -> Result<Vec<(u32, u32, C)>, SetupError> {
    let mut out = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let line_no = n + 1;
        let data = raw.split('#').next().unwrap_or("").trim();
        if data.is_empty() {
            continue;
        }
        let malformed = |reason: String| SetupError::Malformed {
            file: file.to_string(),
            line: line_no,
            reason,
        };
        let mut fields = data.split(';').map(str::trim);
        let range = fields.next().unwrap_or("");
        let name = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed(format!("missing property value in {data:?}")))?;
        let (lo, hi) = parse_range(range).map_err(malformed)?;
        let class = resolve(name).ok_or_else(|| SetupError::UnknownClass {
            file: file.to_string(),
            line: line_no,
            name: name.to_string(),
        })?;
        out.push((lo, hi, class));
    }
    Ok(out)
}

fn parse_range(field: &str) -> Result<(u32, u32), String> {
    let (lo, hi) = match field.split_once("..") {
        Some((lo, hi)) => (parse_code_point(lo)?, parse_code_point(hi)?),
        None => {
            let cp = parse_code_point(field)?;
            (cp, cp)
        }
    };
    if lo > hi {
        return Err(format!("reversed range {field:?}"));
    }
    Ok((lo, hi))
}

fn parse_code_point(s: &str) -> Result<u32, String> {
    let s = s.trim();
    if s.is_empty() || s.len() > 6 {
        return Err(format!("bad code point {s:?}"));
    }
    let cp = u32::from_str_radix(s, 16).map_err(|_| format!("bad code point {s:?}"))?;
    if cp > 0x10FFFF {
        return Err(format!("code point {s} out of range"));
    }
    Ok(cp)
}
