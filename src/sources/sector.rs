use lazy_static::lazy_static;

lazy_static! {
    // Checked in order; the first sector with a matching keyword wins.
    static ref SECTOR_KEYWORDS: Vec<(&'static str, Vec<&'static str>)> = vec![
        ("technology", vec![
            "artificial", "ai", "intelligence", "machine", "neural", "robotics",
            "autonomous", "semiconductor", "chip", "nvidia", "software", "cloud", "data",
        ]),
        ("biotech", vec![
            "bio", "pharma", "therapeutic", "medical", "drug", "clinical", "health",
            "gene", "genomics", "cell", "vaccine", "oncology",
        ]),
        ("energy", vec![
            "solar", "renewable", "energy", "battery", "electric", "power", "grid",
            "oil", "gas", "nuclear", "wind", "uranium",
        ]),
    ];
}

/// Guesses a hot-sector bucket from a company name and description.
///
/// Keywords match as a word prefix ("bio" hits "Biogen", "therapeutic" hits
/// "Therapeutics"). Two-letter keywords such as "ai" must match a whole word.
pub fn classify_sector(company: &str, description: &str) -> Option<&'static str> {
    let text = format!("{} {}", company, description).to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    SECTOR_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|k| words.iter().any(|w| keyword_hits(w, k)))
        })
        .map(|(sector, _)| *sector)
}

fn keyword_hits(word: &str, keyword: &str) -> bool {
    if keyword.len() <= 2 {
        word == keyword
    } else {
        word.starts_with(keyword)
    }
}
