//! Movement relevance classifier.
//!
//! Decides whether raw movement text from the case-tracking API is worth
//! notifying about, and assigns it a coarse category. Matching is case-
//! and diacritic-insensitive substring search against an ordered keyword
//! list; the first match in list order wins, not the most specific one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse category of a case movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementCategory {
    Sentenca,
    Decisao,
    DecisaoInterlocutoria,
    Despacho,
    Publicacao,
    Intimacao,
    /// Generic update; the fallback when no keyword matches.
    Andamento,
}

impl MovementCategory {
    /// User-facing label (pt-BR, with diacritics).
    pub fn label(&self) -> &'static str {
        match self {
            MovementCategory::Sentenca => "Sentença",
            MovementCategory::Decisao => "Decisão",
            MovementCategory::DecisaoInterlocutoria => "Decisão interlocutória",
            MovementCategory::Despacho => "Despacho",
            MovementCategory::Publicacao => "Publicação",
            MovementCategory::Intimacao => "Intimação",
            MovementCategory::Andamento => "Andamento",
        }
    }
}

impl fmt::Display for MovementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword-driven classifier. The keyword list is configuration injected
/// at construction; [`MovementClassifier::default`] carries the canonical
/// ordered list.
#[derive(Debug, Clone)]
pub struct MovementClassifier {
    /// (category, folded keyword) in priority order.
    keywords: Vec<(MovementCategory, String)>,
}

impl Default for MovementClassifier {
    fn default() -> Self {
        Self::with_keywords(vec![
            (MovementCategory::Sentenca, "sentença"),
            (MovementCategory::Decisao, "decisão"),
            (MovementCategory::DecisaoInterlocutoria, "decisão interlocutória"),
            (MovementCategory::Despacho, "despacho"),
            (MovementCategory::Publicacao, "publicação"),
            (MovementCategory::Intimacao, "intimação"),
        ])
    }
}

impl MovementClassifier {
    /// Build with a custom keyword list, highest priority first.
    pub fn with_keywords<S: AsRef<str>>(keywords: Vec<(MovementCategory, S)>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|(category, keyword)| (category, fold(keyword.as_ref())))
                .collect(),
        }
    }

    /// Whether at least one keyword matches. Empty or whitespace-only text
    /// is never relevant; it must not abort a monitoring batch.
    pub fn is_relevant(&self, text: &str) -> bool {
        let folded = fold(text);
        if folded.trim().is_empty() {
            return false;
        }
        self.keywords.iter().any(|(_, keyword)| folded.contains(keyword))
    }

    /// First matching category in list order, `Andamento` when nothing
    /// matches.
    pub fn classify(&self, text: &str) -> MovementCategory {
        let folded = fold(text);
        self.keywords
            .iter()
            .find(|(_, keyword)| folded.contains(keyword))
            .map(|(category, _)| *category)
            .unwrap_or(MovementCategory::Andamento)
    }
}

/// Lowercase and strip Portuguese diacritics so "SENTENÇA", "sentença" and
/// "Sentenca" all compare equal.
fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
