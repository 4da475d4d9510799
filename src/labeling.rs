//! Keyword-set labeling of subjects and clusters.
//!
//! Sentiment and theme are read from fixed word lists, not learned. The
//! lists target Indonesian tourism reviews with a sprinkling of English.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

const POSITIVE_WORDS: &[&str] = &[
    "bagus", "indah", "cantik", "bersih", "nyaman", "asri", "sejuk", "tenang", "recommended",
    "mantap", "keren", "amazing", "spectacular", "beautiful", "great", "excellent", "wonderful",
    "nice", "good", "best", "love", "enjoy", "menyenangkan", "menakjubkan", "luar", "biasa",
    "sempurna", "favorit", "suka", "puas", "top", "oke", "istimewa", "elok", "adem", "fresh",
    "jernih", "terawat", "rapi", "strategis", "lengkap", "terjangkau",
];

const NEGATIVE_WORDS: &[&str] = &[
    "kotor", "jorok", "bau", "rusak", "buruk", "jelek", "tidak", "kurang", "kecewa",
    "mengecewakan", "bad", "poor", "dirty", "terrible", "awful", "waste", "boring",
    "disappointing", "sesak", "ramai", "macet", "mahal", "berbahaya", "seram", "sepi", "kumuh",
    "sempit", "panas",
];

/// Overall tone of a subject's reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    VeryGood,
    Good,
    Poor,
    Neutral,
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::VeryGood => "Sangat Baik",
            Self::Good => "Baik",
            Self::Poor => "Kurang Baik",
            Self::Neutral => "Netral",
        };
        f.write_str(label)
    }
}

/// Kind of attraction a text talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Beach,
    Forest,
    Waterfall,
    Park,
    Religious,
    Culinary,
    Education,
    Shopping,
    /// No theme keyword matched.
    General,
}

impl Theme {
    /// Themes in detection priority order; earlier themes win score ties.
    pub const DETECTABLE: [Theme; 8] = [
        Theme::Beach,
        Theme::Forest,
        Theme::Waterfall,
        Theme::Park,
        Theme::Religious,
        Theme::Culinary,
        Theme::Education,
        Theme::Shopping,
    ];

    /// Keywords matched as substrings of the lower-cased text.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Theme::Beach => &[
                "pantai", "beach", "laut", "pasir", "ombak", "sunset", "sunrise", "diving",
                "snorkeling", "sea", "ocean", "tepi", "pesisir",
            ],
            Theme::Forest => &[
                "hutan", "forest", "pohon", "hijau", "jungle", "trek", "hiking", "mangrove",
                "rimba", "pepohonan", "kanopi", "bakau",
            ],
            Theme::Waterfall => &[
                "air terjun", "waterfall", "curug", "sungai", "kolam", "river", "air", "mengalir",
                "terjun",
            ],
            Theme::Park => &[
                "taman", "park", "bunga", "kebun", "garden", "tanaman", "raya", "kota", "jogging",
            ],
            Theme::Religious => &[
                "masjid", "mosque", "church", "gereja", "vihara", "temple", "religious", "islami",
                "ibadah", "agung", "mushola",
            ],
            Theme::Culinary => &[
                "makan", "kuliner", "food", "resto", "restaurant", "cafe", "kopi", "coffee",
                "rumah makan", "seafood", "warung", "menu",
            ],
            Theme::Education => &[
                "museum", "edukasi", "belajar", "pengetahuan", "sejarah", "history", "konservasi",
                "satwa", "education", "budaya",
            ],
            Theme::Shopping => &[
                "belanja", "shopping", "mall", "toko", "souvenir", "oleh oleh", "pasar", "plaza",
                "tenant", "store",
            ],
            Theme::General => &[],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Beach => "Pantai",
            Theme::Forest => "Hutan",
            Theme::Waterfall => "Air Terjun",
            Theme::Park => "Taman",
            Theme::Religious => "Religi",
            Theme::Culinary => "Kuliner",
            Theme::Education => "Edukasi",
            Theme::Shopping => "Belanja",
            Theme::General => "Umum",
        };
        f.write_str(label)
    }
}

/// Counts positive and negative list words in `words`.
fn polarity_counts<'a>(words: impl Iterator<Item = &'a str>) -> (usize, usize) {
    words.fold((0, 0), |(pos, neg), word| {
        if POSITIVE_WORDS.contains(&word) {
            (pos + 1, neg)
        } else if NEGATIVE_WORDS.contains(&word) {
            (pos, neg + 1)
        } else {
            (pos, neg)
        }
    })
}

/// Classifies the sentiment of a text from its distinct words.
///
/// Returns the category and the score `positive - negative`; a neutral
/// result always scores zero.
pub fn analyze_sentiment(text: &str) -> (SentimentCategory, i32) {
    let lowered = text.to_lowercase();
    let unique: HashSet<&str> = lowered.split_whitespace().collect();
    let (pos, neg) = polarity_counts(unique.into_iter());
    let score = pos as i32 - neg as i32;

    if pos as f64 > neg as f64 * 1.5 {
        (SentimentCategory::VeryGood, score)
    } else if pos > neg {
        (SentimentCategory::Good, score)
    } else if neg > pos {
        (SentimentCategory::Poor, score)
    } else {
        (SentimentCategory::Neutral, 0)
    }
}

/// Detects the dominant theme and up to three related themes.
///
/// A theme scores one point per keyword found anywhere in the text. The
/// related list is the top three themes including the dominant one. With no
/// match the result is [`Theme::General`] and an empty list.
pub fn detect_theme(text: &str) -> (Theme, Vec<Theme>) {
    let lowered = text.to_lowercase();
    let mut scored: Vec<(Theme, usize)> = Theme::DETECTABLE
        .iter()
        .map(|&theme| {
            let score = theme
                .keywords()
                .iter()
                .filter(|keyword| lowered.contains(*keyword))
                .count();
            (theme, score)
        })
        .filter(|&(_, score)| score > 0)
        .collect();

    if scored.is_empty() {
        return (Theme::General, Vec::new());
    }

    // Stable sort keeps DETECTABLE order among equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    let related = scored.iter().take(3).map(|&(theme, _)| theme).collect();
    (scored[0].0, related)
}

/// Names a cluster from its top terms as `"<tone> - <theme>"`, e.g.
/// `"Positif - Pantai"`.
pub fn cluster_label<S: AsRef<str>>(keywords: &[S]) -> String {
    let (pos, neg) = polarity_counts(keywords.iter().map(AsRef::as_ref));
    let tone = if pos > neg {
        "Positif"
    } else if neg > pos {
        "Negatif"
    } else {
        "Netral"
    };

    let joined = keywords
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let (theme, _) = detect_theme(&joined);

    format!("{tone} - {theme}")
}

/// Most frequent words longer than three characters.
///
/// Equal counts keep first-occurrence order.
pub fn extract_top_keywords(text: &str, top_n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (position, word) in lowered
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .enumerate()
    {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}
