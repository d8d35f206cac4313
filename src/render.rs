//! Presentation tree for the home page.
//!
//! [`page`] maps a [`ViewState`] to a [`Page`]; the `Display` impl writes it to a
//! terminal with `colored` and [`lines`] turns it into ratatui text for the TUI.

use crate::config::DisplayConfig;
use crate::summary::{Perspective, PerspectiveKind, Topic};
use crate::view::{ContentKind, ViewState};
use colored::Colorize;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::fmt;

pub const TITLE: &str = "Anew";
pub const INTRO: &str =
    "Anew summarizes current news from more than one perspective, so you get the core without the slant ☺️";
pub const LOADING: &str = "Loading...";
pub const SOURCES_HEADING: &str = "Outlets used for the AI news summary";
pub const EMPTY_ICON: &str = "📰";
pub const EMPTY_MESSAGE: &str = "No AI-summarized news yet. Please check back soon!";
pub const UPDATED_LABEL: &str = "Updated";
pub const REFERENCES_HEADING: &str = "References";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

impl From<PerspectiveKind> for Tone {
    fn from(kind: PerspectiveKind) -> Self {
        match kind {
            PerspectiveKind::Second => Tone::Negative,
            PerspectiveKind::First | PerspectiveKind::Other => Tone::Positive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectivePanel {
    pub tone: Tone,
    pub icon: String,
    pub title: String,
    pub points: Vec<String>,
}

impl From<&Perspective> for PerspectivePanel {
    fn from(perspective: &Perspective) -> Self {
        Self {
            tone: perspective.kind.into(),
            icon: perspective.icon.clone(),
            title: perspective.title.clone(),
            points: perspective.perspectives.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicCard {
    pub title: String,
    pub panels: [PerspectivePanel; 2],
    /// Outbound links; the reference list is omitted when empty
    pub references: Vec<String>,
}

impl From<&Topic> for TopicCard {
    fn from(topic: &Topic) -> Self {
        Self {
            title: topic.title.clone(),
            panels: [
                (&topic.first_perspective).into(),
                (&topic.second_perspective).into(),
            ],
            references: topic.reference_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub intro: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Loading,
    Error(String),
    Empty(Header),
    Topics {
        header: Header,
        sources: Vec<String>,
        updated_at: Option<String>,
        cards: Vec<TopicCard>,
    },
}

impl Page {
    pub fn cards(&self) -> &[TopicCard] {
        match self {
            Page::Topics { cards, .. } => cards,
            _ => &[],
        }
    }
}

/// Build the page for a view state.
pub fn page(state: &ViewState, display: &DisplayConfig) -> Page {
    match state {
        ViewState::Loading => Page::Loading,
        ViewState::Error(message) => Page::Error(message.clone()),
        ViewState::Content(content) => {
            let header = Header {
                intro: display.intro,
            };
            match content.kind() {
                ContentKind::Empty => Page::Empty(header),
                ContentKind::NonEmpty => Page::Topics {
                    header,
                    sources: display.sources.clone(),
                    updated_at: content.updated_at(),
                    cards: content.topics.iter().map(TopicCard::from).collect(),
                },
            }
        }
    }
}

fn sources_line(sources: &[String]) -> String {
    sources.join(" · ")
}

fn panel_heading(panel: &PerspectivePanel) -> String {
    if panel.icon.is_empty() {
        panel.title.clone()
    } else {
        format!("{} {}", panel.icon, panel.title)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = match self {
            Page::Loading => return writeln!(f, "{}", LOADING.dimmed()),
            Page::Error(message) => return writeln!(f, "{}", message.red().bold()),
            Page::Empty(header) | Page::Topics { header, .. } => header,
        };

        if header.intro {
            writeln!(f, "{}\n", INTRO.italic())?;
        }
        writeln!(f, "{}\n", TITLE.bold())?;

        let Page::Topics {
            sources,
            updated_at,
            cards,
            ..
        } = self
        else {
            writeln!(f, "  {}", EMPTY_ICON)?;
            return writeln!(f, "  {}", EMPTY_MESSAGE.dimmed());
        };

        if !sources.is_empty() {
            writeln!(f, "{}", SOURCES_HEADING.bold())?;
            writeln!(f, "  {}\n", sources_line(sources))?;
        }
        if let Some(updated_at) = updated_at {
            writeln!(f, "{}: {}\n", UPDATED_LABEL, updated_at)?;
        }

        for card in cards {
            writeln!(f, "=== {} ===\n", card.title.bold())?;
            for panel in &card.panels {
                let heading = panel_heading(panel);
                let heading = match panel.tone {
                    Tone::Positive => heading.green(),
                    Tone::Negative => heading.red(),
                };
                writeln!(f, "{}", heading.bold())?;
                for point in &panel.points {
                    writeln!(f, "  • {}", point)?;
                }
                writeln!(f)?;
            }
            if !card.references.is_empty() {
                writeln!(f, "🔗 {}:", REFERENCES_HEADING)?;
                for url in &card.references {
                    writeln!(f, "  {}", url.underline())?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Negative => Color::Red,
    }
}

/// Lay the page out as ratatui lines.
pub fn lines(page: &Page) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let header = match page {
        Page::Loading => return vec![Line::styled(LOADING, dim)],
        Page::Error(message) => {
            return vec![Line::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]
        }
        Page::Empty(header) | Page::Topics { header, .. } => header,
    };

    let mut out = Vec::new();
    if header.intro {
        out.push(Line::styled(
            INTRO,
            Style::default().add_modifier(Modifier::ITALIC),
        ));
        out.push(Line::default());
    }
    out.push(Line::styled(TITLE, bold));
    out.push(Line::default());

    let Page::Topics {
        sources,
        updated_at,
        cards,
        ..
    } = page
    else {
        out.push(Line::from(EMPTY_ICON).centered());
        out.push(Line::styled(EMPTY_MESSAGE, dim).centered());
        return out;
    };

    if !sources.is_empty() {
        out.push(Line::styled(SOURCES_HEADING, bold));
        out.push(Line::from(format!("  {}", sources_line(sources))));
        out.push(Line::default());
    }
    if let Some(updated_at) = updated_at {
        out.push(Line::styled(format!("{}: {}", UPDATED_LABEL, updated_at), dim));
        out.push(Line::default());
    }

    for card in cards {
        out.push(Line::styled(
            card.title.clone(),
            bold.fg(Color::Cyan),
        ));
        for panel in &card.panels {
            out.push(Line::styled(
                panel_heading(panel),
                bold.fg(tone_color(panel.tone)),
            ));
            for point in &panel.points {
                out.push(Line::from(vec![
                    Span::styled("  • ", Style::default().fg(tone_color(panel.tone))),
                    Span::raw(point.clone()),
                ]));
            }
        }
        if !card.references.is_empty() {
            out.push(Line::styled(format!("🔗 {}", REFERENCES_HEADING), dim));
            for url in &card.references {
                out.push(Line::styled(
                    format!("  {}", url),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                ));
            }
        }
        out.push(Line::default());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Content;

    fn perspective(kind: PerspectiveKind, title: &str, icon: &str) -> Perspective {
        Perspective {
            kind,
            title: title.to_string(),
            icon: icon.to_string(),
            perspectives: vec![format!("{} point", title)],
            links: vec![],
        }
    }

    fn topic(title: &str, references: &[&str]) -> Topic {
        Topic {
            title: title.to_string(),
            first_perspective: perspective(PerspectiveKind::First, "Upside", "📈"),
            second_perspective: perspective(PerspectiveKind::Second, "Downside", "📉"),
            reference_url: references.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn content(topics: Vec<Topic>, created_at: Option<&str>) -> ViewState {
        ViewState::Content(Content {
            topics,
            created_at: created_at.map(str::to_string),
        })
    }

    fn text(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn loading_and_error_pages() {
        let display = DisplayConfig::default();
        assert_eq!(page(&ViewState::Loading, &display), Page::Loading);
        assert_eq!(
            page(&ViewState::Error("nope".into()), &display),
            Page::Error("nope".into())
        );
        assert_eq!(text(&lines(&Page::Loading)), LOADING);
    }

    #[test]
    fn empty_content_has_no_cards() {
        let display = DisplayConfig::default();
        let page = page(&content(vec![], None), &display);
        assert_eq!(page, Page::Empty(Header { intro: true }));
        assert!(page.cards().is_empty());

        let rendered = text(&lines(&page));
        assert!(rendered.contains(EMPTY_ICON));
        assert!(rendered.contains(EMPTY_MESSAGE));
        assert!(!rendered.contains(SOURCES_HEADING));
    }

    #[test]
    fn topics_become_cards_with_tones() {
        let display = DisplayConfig::default();
        let page = page(
            &content(vec![topic("Rates", &[]), topic("Chips", &[])], None),
            &display,
        );
        let cards = page.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].panels[0].tone, Tone::Positive);
        assert_eq!(cards[0].panels[1].tone, Tone::Negative);
        assert_eq!(cards[1].title, "Chips");
    }

    #[test]
    fn references_only_when_present() {
        let display = DisplayConfig::default();
        let without = lines(&page(&content(vec![topic("Rates", &[])], None), &display));
        assert!(!text(&without).contains(REFERENCES_HEADING));

        let with = lines(&page(
            &content(vec![topic("Rates", &["https://news.example.com/1"])], None),
            &display,
        ));
        let rendered = text(&with);
        assert!(rendered.contains(REFERENCES_HEADING));
        assert!(rendered.contains("https://news.example.com/1"));
    }

    #[test]
    fn update_line_follows_created_at() {
        let display = DisplayConfig::default();
        let page = page(
            &content(vec![topic("Rates", &[])], Some("2025-06-20T13:00:00")),
            &display,
        );
        match &page {
            Page::Topics { updated_at, .. } => {
                assert_eq!(updated_at.as_deref(), Some("2025.06.20, 13:00"))
            }
            other => panic!("unexpected page: {:?}", other),
        }
        assert!(text(&lines(&page)).contains("Updated: 2025.06.20, 13:00"));
    }

    #[test]
    fn blank_created_at_has_no_update_line() {
        let display = DisplayConfig::default();
        let page = page(&content(vec![topic("Rates", &[])], Some("")), &display);
        match &page {
            Page::Topics { updated_at, .. } => assert_eq!(updated_at, &None),
            other => panic!("unexpected page: {:?}", other),
        }
        assert!(!text(&lines(&page)).contains(UPDATED_LABEL));
        assert!(!page.to_string().contains(UPDATED_LABEL));
    }

    #[test]
    fn display_writes_sources_and_points() {
        let display = DisplayConfig {
            sources: vec!["Daily A".into(), "Daily B".into()],
            intro: false,
        };
        let rendered = page(&content(vec![topic("Rates", &[])], None), &display).to_string();
        assert!(rendered.contains("Daily A · Daily B"));
        assert!(rendered.contains("Upside point"));
        assert!(rendered.contains("Downside point"));
        assert!(!rendered.contains(INTRO));
    }
}
