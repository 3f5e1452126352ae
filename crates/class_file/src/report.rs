use std::fmt;

/// A `Utf8` entry worth reporting. `index` is its logical constant pool index.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Hit {
    Listed {
        index: u16,
        value: Vec<u8>,
    },
    Changed {
        index: u16,
        original: Vec<u8>,
        rewritten: Vec<u8>,
    },
}
impl Hit {
    pub fn index(&self) -> u16 {
        match self {
            Hit::Listed { index, .. } | Hit::Changed { index, .. } => *index,
        }
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hit::Listed { value, .. } => write!(f, "  {}", String::from_utf8_lossy(value)),
            Hit::Changed {
                original,
                rewritten,
                ..
            } => write!(
                f,
                "  \"{}\" => \"{}\"",
                String::from_utf8_lossy(original),
                String::from_utf8_lossy(rewritten)
            ),
        }
    }
}

/// Diagnostics for one archive member.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MemberReport {
    name: String,
    hits: Vec<Hit>,
}
impl MemberReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hits: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub(crate) fn push(&mut self, hit: Hit) {
        self.hits.push(hit);
    }
}

impl fmt::Display for MemberReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits.is_empty() {
            return Ok(());
        }

        writeln!(f, "{}", self.name)?;
        for hit in &self.hits {
            writeln!(f, "{}", hit)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod member_report_tests {
    use super::*;

    #[test]
    fn it_should_render_nothing_without_hits() {
        assert_eq!(MemberReport::new("a/B.class").to_string(), "");
    }

    #[test]
    fn it_should_group_hits_under_the_member_name() {
        let mut report = MemberReport::new("a/B.class");
        report.push(Hit::Listed {
            index: 1,
            value: b"a/B".to_vec(),
        });
        report.push(Hit::Changed {
            index: 4,
            original: b"com/Old".to_vec(),
            rewritten: b"com/New".to_vec(),
        });

        assert_eq!(
            report.to_string(),
            "a/B.class\n  a/B\n  \"com/Old\" => \"com/New\"\n\n"
        );
        assert_eq!(
            report.hits().iter().map(Hit::index).collect::<Vec<_>>(),
            [1, 4]
        );
    }
}
