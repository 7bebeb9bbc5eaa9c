// src/load/columns.rs
use crate::error::{PopError, Result};
use crate::load::clean::clean_header;

/// A required input column: canonical (Korean) header plus accepted aliases.
#[derive(Debug, Clone, Copy)]
pub struct RequiredColumn {
    pub field: &'static str,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

impl RequiredColumn {
    fn matches(&self, header: &str) -> bool {
        header == self.canonical || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(header))
    }

    fn accepted(&self) -> String {
        std::iter::once(self.canonical)
            .chain(self.aliases.iter().copied())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub const REGION: RequiredColumn = RequiredColumn {
    field: "region",
    canonical: "지역",
    aliases: &["region"],
};
pub const YEAR: RequiredColumn = RequiredColumn {
    field: "year",
    canonical: "연도",
    aliases: &["year"],
};
pub const POPULATION: RequiredColumn = RequiredColumn {
    field: "population",
    canonical: "인구",
    aliases: &["population"],
};
pub const BIRTHS: RequiredColumn = RequiredColumn {
    field: "births",
    canonical: "출생아수(명)",
    aliases: &["births", "births(count)"],
};
pub const DEATHS: RequiredColumn = RequiredColumn {
    field: "deaths",
    canonical: "사망자수(명)",
    aliases: &["deaths", "deaths(count)"],
};

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub region: usize,
    pub year: usize,
    pub population: usize,
    pub births: usize,
    pub deaths: usize,
}

impl ColumnIndex {
    /// Locate every required column; the first one missing is a fatal error.
    pub fn resolve<'a, I>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<&str> = headers.into_iter().map(clean_header).collect();
        let find = |col: &RequiredColumn| {
            headers
                .iter()
                .position(|h| col.matches(h))
                .ok_or_else(|| PopError::MissingColumn {
                    column: col.field,
                    accepted: col.accepted(),
                })
        };

        Ok(Self {
            region: find(&REGION)?,
            year: find(&YEAR)?,
            population: find(&POPULATION)?,
            births: find(&BIRTHS)?,
            deaths: find(&DEATHS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_korean_headers_in_any_order() {
        let idx = ColumnIndex::resolve(vec![
            "연도",
            "\u{feff}지역",
            "사망자수(명)",
            "인구",
            "비고",
            "출생아수(명)",
        ])
        .unwrap();
        assert_eq!(
            idx,
            ColumnIndex {
                region: 1,
                year: 0,
                population: 3,
                births: 5,
                deaths: 2
            }
        );
    }

    #[test]
    fn resolves_english_aliases() {
        let idx =
            ColumnIndex::resolve(vec!["Region", "YEAR", "population", "births(count)", "deaths"])
                .unwrap();
        assert_eq!(idx.region, 0);
        assert_eq!(idx.births, 3);
    }

    #[test]
    fn missing_column_is_reported_by_field() {
        let err = ColumnIndex::resolve(vec!["지역", "연도", "인구", "출생아수(명)"]).unwrap_err();
        match err {
            PopError::MissingColumn { column, accepted } => {
                assert_eq!(column, "deaths");
                assert!(accepted.contains("사망자수(명)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
