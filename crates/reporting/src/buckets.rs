//! Fixed age buckets used by both the age chart and age drill-down.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBucket {
    From18To25,
    From26To35,
    From36To45,
    From46To55,
    Over55,
}

impl AgeBucket {
    /// Every bucket in chart order.
    pub const ALL: [AgeBucket; 5] = [
        AgeBucket::From18To25,
        AgeBucket::From26To35,
        AgeBucket::From36To45,
        AgeBucket::From46To55,
        AgeBucket::Over55,
    ];

    /// Closed intervals checked in order, so a boundary age lands in the
    /// lower bucket. Ages below 18 fall into the first bucket.
    pub fn for_age(age: u8) -> Self {
        match age {
            0..=25 => Self::From18To25,
            26..=35 => Self::From26To35,
            36..=45 => Self::From36To45,
            46..=55 => Self::From46To55,
            _ => Self::Over55,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::From18To25 => "18-25",
            Self::From26To35 => "26-35",
            Self::From36To45 => "36-45",
            Self::From46To55 => "46-55",
            Self::Over55 => "56+",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_lower_bucket() {
        assert_eq!(AgeBucket::for_age(18).label(), "18-25");
        assert_eq!(AgeBucket::for_age(25).label(), "18-25");
        assert_eq!(AgeBucket::for_age(26).label(), "26-35");
        assert_eq!(AgeBucket::for_age(35).label(), "26-35");
        assert_eq!(AgeBucket::for_age(45).label(), "36-45");
        assert_eq!(AgeBucket::for_age(55).label(), "46-55");
        assert_eq!(AgeBucket::for_age(56).label(), "56+");
        assert_eq!(AgeBucket::for_age(65).label(), "56+");
    }

    #[test]
    fn test_every_age_claimed_by_exactly_one_bucket() {
        let bounds = [(18, 25), (26, 35), (36, 45), (46, 55), (56, u8::MAX)];
        for age in 18..=65u8 {
            let claiming: Vec<_> = AgeBucket::ALL
                .iter()
                .zip(bounds)
                .filter(|(_, (lo, hi))| (*lo..=*hi).contains(&age))
                .map(|(b, _)| *b)
                .collect();
            assert_eq!(claiming, vec![AgeBucket::for_age(age)], "age {age}");
        }
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> = AgeBucket::ALL.iter().map(|b| b.to_string()).collect();
        assert_eq!(labels, vec!["18-25", "26-35", "36-45", "46-55", "56+"]);
    }
}
