use crate::summarize::Summarizer;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

/// Title given to a slide that still has none once creation completes.
pub const PLACEHOLDER_TITLE: &str = "Untitled";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct SlideId(u64);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ImageRef(String);

crate::impl_string_newtype!(ImageRef);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlideKind {
    Image,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub id: SlideId,
    pub title: String,
    pub content: String,
    pub image: Option<ImageRef>,
    pub kind: SlideKind,
}

/// Input of the slide creation contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl SlideDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// The title given by the author, if it has any content.
    pub fn given_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// True when committing this draft requires a round trip to the summarizer.
    pub fn needs_summary(&self) -> bool {
        self.given_title().is_none() && !self.content.trim().is_empty()
    }
}

/// Resolves the final title of a draft: the author's title, else a summary of the content.
pub async fn resolve_title<S: Summarizer>(draft: &SlideDraft, summarizer: &S) -> String {
    if let Some(title) = draft.given_title() {
        return title.to_string();
    }
    if draft.needs_summary() {
        return summarizer.summarize(&draft.content).await;
    }
    String::new()
}

/// The ordered slide collection. Order is insertion order and decides ring placement.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    slides: Vec<Slide>,
    next_id: u64,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a deck from drafts whose titles are already final; seeds never hit the summarizer.
    pub fn from_drafts(drafts: impl IntoIterator<Item = SlideDraft>) -> Self {
        let mut deck = Self::new();
        for draft in drafts {
            let title = draft.given_title().unwrap_or_default().to_string();
            deck.insert(title, draft);
        }
        deck
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    pub fn get(&self, id: SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: SlideId) -> bool {
        self.get(id).is_some()
    }

    pub fn index_of(&self, id: SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<SlideId> {
        self.slides.get(index).map(|s| s.id)
    }

    /// Readability advisory: the ring stays usable past this, it just gets crowded.
    pub fn is_crowded(&self, soft_capacity: usize) -> bool {
        self.len() >= soft_capacity
    }

    /// Commits a slide with a resolved title and assigns it a fresh id.
    pub fn insert(&mut self, title: String, draft: SlideDraft) -> &Slide {
        let id = SlideId(self.next_id);
        self.next_id += 1;

        let title = match title.trim() {
            "" => PLACEHOLDER_TITLE.to_string(),
            t => t.to_string(),
        };
        let image = draft.image.filter(|i| !i.trim().is_empty());
        let kind = if image.is_some() {
            SlideKind::Image
        } else {
            SlideKind::Text
        };

        let index = self.slides.len();
        self.slides.push(Slide {
            id,
            title,
            content: draft.content,
            image,
            kind,
        });
        &self.slides[index]
    }

    /// Full creation contract: the collection is untouched until the title is known.
    pub async fn create_slide<S: Summarizer>(
        &mut self,
        draft: SlideDraft,
        summarizer: &S,
    ) -> &Slide {
        let title = resolve_title(&draft, summarizer).await;
        self.insert(title, draft)
    }

    pub fn remove(&mut self, id: SlideId) -> Option<Slide> {
        let index = self.index_of(id)?;
        Some(self.slides.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::{FALLBACK_TITLE, TitleService};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSummarizer {
        calls: AtomicUsize,
    }

    impl Summarizer for CountingSummarizer {
        async fn summarize(&self, text: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            format!("About {}", text.split_whitespace().next().unwrap_or(""))
        }
    }

    fn counting() -> CountingSummarizer {
        CountingSummarizer {
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut deck = Deck::new();
        let a = deck.insert("A".into(), SlideDraft::new("a")).id;
        let b = deck.insert("B".into(), SlideDraft::new("b")).id;
        deck.remove(b);
        let c = deck.insert("C".into(), SlideDraft::new("c")).id;
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_eq!(deck.index_of(c), Some(1));
    }

    #[test]
    fn test_kind_follows_image() {
        let mut deck = Deck::new();
        let image = SlideDraft::new("x").with_image(ImageRef::new("https://example.org/a.png"));
        assert_eq!(deck.insert("t".into(), image).kind, SlideKind::Image);
        assert_eq!(
            deck.insert("t".into(), SlideDraft::new("x")).kind,
            SlideKind::Text
        );
        let blank = SlideDraft::new("x").with_image(ImageRef::new(" "));
        let slide = deck.insert("t".into(), blank);
        assert_eq!(slide.kind, SlideKind::Text);
        assert!(slide.image.is_none());
    }

    #[test]
    fn test_empty_title_gets_placeholder() {
        let mut deck = Deck::new();
        assert_eq!(
            deck.insert("  ".into(), SlideDraft::new("x")).title,
            PLACEHOLDER_TITLE
        );
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut deck = Deck::from_drafts([SlideDraft::new("a").with_title("A")]);
        assert!(deck.remove(SlideId::from(42)).is_none());
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_crowded_at_capacity() {
        let deck = Deck::from_drafts((0..24).map(|i| SlideDraft::new(format!("slide {i}"))));
        assert!(deck.is_crowded(24));
        assert!(!deck.is_crowded(25));
    }

    #[tokio::test]
    async fn test_given_title_skips_summarizer() {
        let summarizer = counting();
        let mut deck = Deck::new();
        let slide = deck
            .create_slide(SlideDraft::new("body").with_title("Mine"), &summarizer)
            .await;
        assert_eq!(slide.title, "Mine");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_title_is_summarized() {
        let summarizer = counting();
        let mut deck = Deck::new();
        let title = deck
            .create_slide(SlideDraft::new("Orbits everywhere"), &summarizer)
            .await
            .title
            .clone();
        assert_eq!(title, "About Orbits");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_draft_gets_placeholder() {
        let summarizer = counting();
        let mut deck = Deck::new();
        let title = deck
            .create_slide(SlideDraft::new(""), &summarizer)
            .await
            .title
            .clone();
        assert_eq!(title, PLACEHOLDER_TITLE);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_summarizer_falls_back() {
        let mut deck = Deck::new();
        let title = deck
            .create_slide(SlideDraft::new("text"), &TitleService::Disabled)
            .await
            .title
            .clone();
        assert_eq!(title, FALLBACK_TITLE);
        assert_eq!(deck.len(), 1);
    }
}
