use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Selector};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Class(String),
    AttrEquals(String, String),
    AttrPresent(String),
}

/// One `{tag, attribute predicates}` step of a structural path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    tag: String,
    predicates: Vec<Predicate>,
}

impl Step {
    pub fn tag(name: &str) -> Self {
        Self {
            tag: name.to_string(),
            predicates: Vec::new(),
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.predicates.push(Predicate::Class(class.to_string()));
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.predicates
            .push(Predicate::AttrEquals(name.to_string(), value.to_string()));
        self
    }

    pub fn has_attr(mut self, name: &str) -> Self {
        self.predicates.push(Predicate::AttrPresent(name.to_string()));
        self
    }

    fn css(&self) -> String {
        let mut css = self.tag.clone();
        for predicate in &self.predicates {
            match predicate {
                Predicate::Class(class) => {
                    css.push('.');
                    css.push_str(class);
                }
                Predicate::AttrEquals(name, value) => {
                    css.push_str(&format!("[{}=\"{}\"]", name, value.replace('"', "\\\"")));
                }
                Predicate::AttrPresent(name) => {
                    css.push_str(&format!("[{}]", name));
                }
            }
        }
        css
    }
}

/// Ordered steps (each a descendant of the previous one) plus an optional
/// position into the resulting matches, compiled once into a CSS selector.
#[derive(Debug, Clone)]
pub struct StructuralPath {
    css: String,
    selector: Selector,
    index: Option<usize>,
}

impl StructuralPath {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Result<Self> {
        let css = steps
            .into_iter()
            .map(|step| step.css())
            .collect::<Vec<_>>()
            .join(" ");

        if css.is_empty() {
            return Err(ScrapeError::Selector("empty structural path".to_string()));
        }

        let selector =
            Selector::parse(&css).map_err(|e| ScrapeError::Selector(format!("{css}: {e}")))?;

        Ok(Self {
            css,
            selector,
            index: None,
        })
    }

    /// Picks the `index`-th match (0-based) instead of the first one.
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn locate<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        root.select(&self.selector).nth(self.index.unwrap_or(0))
    }

    pub fn locate_all<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match self.index {
            Some(index) => root.select(&self.selector).nth(index).into_iter().collect(),
            None => root.select(&self.selector).collect(),
        }
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.css, index),
            None => write!(f, "{}", self.css),
        }
    }
}

/// Trims, collapses inner whitespace and applies NFC.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .nfc()
        .collect()
}

pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const TABLE: &str = r#"
        <table class="info">
            <tr><th>One</th><td>  first
                value </td></tr>
            <tr><th>Two</th><td data-kind="second">second</td></tr>
        </table>
        <p>Caf&eacute;</p>
    "#;

    #[test]
    fn compiles_steps_into_css() {
        let path = StructuralPath::new([
            Step::tag("table").class("info"),
            Step::tag("td").attr("data-kind", "second"),
        ])
        .unwrap();
        assert_eq!(path.to_string(), r#"table.info td[data-kind="second"]"#);

        let path = StructuralPath::new([Step::tag("a").has_attr("href")])
            .unwrap()
            .at(2);
        assert_eq!(path.to_string(), "a[href][2]");
    }

    #[test]
    fn rejects_empty_and_invalid_paths() {
        assert!(matches!(
            StructuralPath::new(Vec::<Step>::new()),
            Err(ScrapeError::Selector(_))
        ));
        assert!(matches!(
            StructuralPath::new([Step::tag("td").class("")]),
            Err(ScrapeError::Selector(_))
        ));
    }

    #[test]
    fn locates_by_position() {
        let document = Html::parse_fragment(TABLE);
        let cells =
            StructuralPath::new([Step::tag("table").class("info"), Step::tag("td")]).unwrap();

        let first = cells.locate(document.root_element()).unwrap();
        assert_eq!(element_text(first), "first value");

        let second = cells.clone().at(1).locate(document.root_element()).unwrap();
        assert_eq!(element_text(second), "second");

        assert!(cells.clone().at(2).locate(document.root_element()).is_none());
        assert_eq!(cells.locate_all(document.root_element()).len(), 2);
        assert_eq!(cells.at(1).locate_all(document.root_element()).len(), 1);
    }

    #[test]
    fn normalizes_whitespace_and_entities() {
        assert_eq!(normalize_text("  a \n\t b  "), "a b");
        assert_eq!(normalize_text(""), "");

        let document = Html::parse_fragment(TABLE);
        let p = StructuralPath::new([Step::tag("p")]).unwrap();
        assert_eq!(element_text(p.locate(document.root_element()).unwrap()), "Café");
    }
}
