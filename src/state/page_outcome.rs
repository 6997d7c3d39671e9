/// What happened to one selected URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was stored and its links offered to the frontier
    Indexed {
        page_id: i64,
        /// Links offered, duplicates included
        links: usize,
    },

    /// The fetch failed; the URL is abandoned
    FetchFailed,

    /// No title was found; nothing was stored and no links were offered
    Untitled,
}

impl PageOutcome {
    /// Returns true if the page reached storage
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }
}
