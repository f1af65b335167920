/// Rewrite a raw header into its canonical column name.
///
/// `" access_to_electricity% "` becomes `"access_to_electricitypct"`,
/// `"GDP current US"` becomes `"GDP_current_US"`. Applying it twice gives
/// the same result as applying it once.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().replace('%', "pct").replace(' ', "_")
}

/// Normalize a whole header row, dropping later duplicates.
///
/// Returns `(source index, canonical name)` pairs for the columns kept.
pub fn normalize_headers<'a, I>(raw: I) -> Vec<(usize, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut kept: Vec<(usize, String)> = Vec::new();
    for (idx, header) in raw.into_iter().enumerate() {
        let name = normalize_header(header);
        if kept.iter().any(|(_, existing)| *existing == name) {
            log::warn!("Column {idx} ('{header}') duplicates canonical name '{name}', ignoring it");
            continue;
        }
        kept.push((idx, name));
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_HEADERS: &[&str] = &[
        "country",
        " date ",
        "agricultural_land%",
        "renewvable_energy_consumption%",
        "GDP current US",
        "  % of total  ",
        "a%b c%",
        "\tlife_expectancy_at_birth\n",
        "",
        "%%",
        "already_pct",
    ];

    #[test]
    fn rewrites_percent_and_spaces() {
        assert_eq!(normalize_header(" date "), "date");
        assert_eq!(normalize_header("agricultural_land%"), "agricultural_landpct");
        assert_eq!(normalize_header("GDP current US"), "GDP_current_US");
        assert_eq!(normalize_header("  % of total  "), "pct_of_total");
        assert_eq!(normalize_header("%%"), "pctpct");
    }

    #[test]
    fn normalizing_is_idempotent() {
        for raw in RAW_HEADERS {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once, "header {raw:?}");
        }
    }

    #[test]
    fn duplicate_canonical_names_keep_the_first() {
        let kept = normalize_headers(["a b", "x", "a_b", "y%"]);
        assert_eq!(
            kept,
            vec![
                (0, "a_b".to_string()),
                (1, "x".to_string()),
                (3, "ypct".to_string())
            ]
        );
    }
}
