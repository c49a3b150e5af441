//! Character-class runs and descriptor keywords

use logos::Logos;

/// A maximal run of one character class
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    #[regex("[A-Z]+")]
    Upper,
    #[regex("[a-z]+")]
    Lower,
    #[regex("[0-9]+")]
    Digit,
    // Separators such as `_`; never part of a word
    #[regex("[^A-Za-z0-9]+")]
    Other,
}

/// Words with structural meaning in a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // === Operations ===
    Insert,
    Find,
    Update,
    Delete,
    Count,
    Transaction,
    Bulk,

    // === Modes ===
    One,
    Many,

    // === Query ===
    By,
    All,
    And,
    Or,
    /// Left bracket
    Lb,
    /// Right bracket
    Rb,

    // === Find options ===
    Order,
    Desc,
    Skip,
    Limit,

    // === Update / Transaction ===
    Upsert,
    Collection,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "Insert" => Keyword::Insert,
            "Find" => Keyword::Find,
            "Update" => Keyword::Update,
            "Delete" => Keyword::Delete,
            "Count" => Keyword::Count,
            "Transaction" => Keyword::Transaction,
            "Bulk" => Keyword::Bulk,
            "One" => Keyword::One,
            "Many" => Keyword::Many,
            "By" => Keyword::By,
            "All" => Keyword::All,
            "And" => Keyword::And,
            "Or" => Keyword::Or,
            "Lb" => Keyword::Lb,
            "Rb" => Keyword::Rb,
            "Order" => Keyword::Order,
            "Desc" => Keyword::Desc,
            "Skip" => Keyword::Skip,
            "Limit" => Keyword::Limit,
            "Upsert" => Keyword::Upsert,
            "Collection" => Keyword::Collection,
            _ => return None,
        };
        Some(keyword)
    }

    /// Get a human-readable description of the keyword
    pub fn describe(&self) -> &'static str {
        match self {
            Keyword::Insert => "'Insert'",
            Keyword::Find => "'Find'",
            Keyword::Update => "'Update'",
            Keyword::Delete => "'Delete'",
            Keyword::Count => "'Count'",
            Keyword::Transaction => "'Transaction'",
            Keyword::Bulk => "'Bulk'",
            Keyword::One => "'One'",
            Keyword::Many => "'Many'",
            Keyword::By => "'By'",
            Keyword::All => "'All'",
            Keyword::And => "'And'",
            Keyword::Or => "'Or'",
            Keyword::Lb => "left bracket 'Lb'",
            Keyword::Rb => "right bracket 'Rb'",
            Keyword::Order => "'Order'",
            Keyword::Desc => "'Desc'",
            Keyword::Skip => "'Skip'",
            Keyword::Limit => "'Limit'",
            Keyword::Upsert => "'Upsert'",
            Keyword::Collection => "'Collection'",
        }
    }

    /// Keywords that start an operation
    pub fn is_operation(&self) -> bool {
        matches!(
            self,
            Keyword::Insert
                | Keyword::Find
                | Keyword::Update
                | Keyword::Delete
                | Keyword::Count
                | Keyword::Transaction
                | Keyword::Bulk
        )
    }
}
