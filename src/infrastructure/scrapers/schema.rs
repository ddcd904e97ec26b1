use super::path::{element_text, normalize_text, StructuralPath};
use crate::error::{Result, ScrapeError};
use rustc_hash::FxHashMap;
use scraper::ElementRef;
use tracing::{debug, warn};
use url::Url;

const LIST_DELIMITER: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Text,
    Attr(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    /// One node whose text is a `", "` joined list.
    Split,
    /// Every matching node becomes one entry.
    Each,
    Integer,
    /// Integer that degrades to "unknown" instead of failing.
    Year,
    /// Resolved against the page URL.
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Integer(i64),
    Year(Option<i32>),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    path: StructuralPath,
    source: Source,
    coercion: Coercion,
    required: bool,
    allow_blank: bool,
}

impl FieldSpec {
    pub fn required(name: &'static str, path: StructuralPath) -> Self {
        Self {
            name,
            path,
            source: Source::Text,
            coercion: Coercion::Text,
            required: true,
            allow_blank: false,
        }
    }

    pub fn optional(name: &'static str, path: StructuralPath) -> Self {
        Self {
            required: false,
            ..Self::required(name, path)
        }
    }

    pub fn attr(mut self, attr: &'static str) -> Self {
        self.source = Source::Attr(attr);
        self
    }

    pub fn coerce(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    /// Accepts a present but empty node for a required text field.
    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    fn read(&self, element: ElementRef<'_>) -> Option<String> {
        match self.source {
            Source::Text => Some(element_text(element)),
            Source::Attr(attr) => element.value().attr(attr).map(normalize_text),
        }
    }

    fn evaluate(
        &self,
        root: ElementRef<'_>,
        base: &Url,
    ) -> std::result::Result<Option<FieldValue>, FieldFailure> {
        if self.coercion == Coercion::Each {
            let items: Vec<String> = self
                .path
                .locate_all(root)
                .into_iter()
                .filter_map(|element| self.read(element))
                .filter(|item| !item.is_empty())
                .collect();

            if items.is_empty() && self.required {
                return Err(FieldFailure::Missing);
            }
            return Ok(Some(FieldValue::List(items)));
        }

        let raw = match self.path.locate(root).and_then(|element| self.read(element)) {
            Some(raw) => raw,
            None => {
                return match self.coercion {
                    Coercion::Year => Ok(Some(FieldValue::Year(None))),
                    _ if self.required => Err(FieldFailure::Missing),
                    Coercion::Split => Ok(Some(FieldValue::List(Vec::new()))),
                    _ => Ok(None),
                }
            }
        };

        let blank_rejected = matches!(self.coercion, Coercion::Text | Coercion::Link)
            && self.required
            && !self.allow_blank;
        if blank_rejected && raw.is_empty() {
            return Err(FieldFailure::Missing);
        }

        let value = match self.coercion {
            Coercion::Text => FieldValue::Text(raw),
            Coercion::Split => FieldValue::List(split_list(&raw)),
            Coercion::Each => FieldValue::List(vec![raw]),
            Coercion::Integer => match raw.parse::<i64>() {
                Ok(value) => FieldValue::Integer(value),
                Err(_) => return Err(FieldFailure::Unparseable(raw)),
            },
            Coercion::Year => FieldValue::Year(parse_year(&raw)),
            Coercion::Link => match base.join(&raw) {
                Ok(url) => FieldValue::Text(url.to_string()),
                Err(_) => return Err(FieldFailure::Unparseable(raw)),
            },
        };

        Ok(Some(value))
    }
}

enum FieldFailure {
    Missing,
    Unparseable(String),
}

/// Ordered field specs evaluated uniformly against one root node.
#[derive(Debug, Clone)]
pub struct Schema {
    scope: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(scope: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { scope, fields }
    }

    /// Evaluates every field, then fails with the first failing field in
    /// schema order, if any. Optional fields never fail on absence.
    pub fn extract(&self, root: ElementRef<'_>, base: &Url) -> Result<Record> {
        let mut values = FxHashMap::default();
        let mut first_error = None;

        for spec in &self.fields {
            match spec.evaluate(root, base) {
                Ok(Some(value)) => {
                    values.insert(spec.name, value);
                }
                Ok(None) => {}
                Err(failure) => {
                    let field = qualify(self.scope, spec.name);
                    let error = match failure {
                        FieldFailure::Missing => {
                            debug!(field = %field, path = %spec.path, "Required field not found");
                            ScrapeError::schema_mismatch(field)
                        }
                        FieldFailure::Unparseable(raw) => {
                            debug!(field = %field, value = %raw, "Field value not coercible");
                            ScrapeError::field_parse(field, raw)
                        }
                    };
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(Record {
                scope: self.scope,
                values,
            }),
        }
    }
}

/// Coerced values of one schema evaluation, keyed by field name.
#[derive(Debug, Default)]
pub struct Record {
    scope: &'static str,
    values: FxHashMap<&'static str, FieldValue>,
}

impl Record {
    fn missing(&self, name: &str) -> ScrapeError {
        ScrapeError::schema_mismatch(qualify(self.scope, name))
    }

    pub fn text(&mut self, name: &str) -> Result<String> {
        match self.values.remove(name) {
            Some(FieldValue::Text(text)) => Ok(text),
            _ => Err(self.missing(name)),
        }
    }

    pub fn text_or_default(&mut self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    pub fn list(&mut self, name: &str) -> Vec<String> {
        match self.values.remove(name) {
            Some(FieldValue::List(items)) => items,
            _ => Vec::new(),
        }
    }

    pub fn integer<T: TryFrom<i64>>(&mut self, name: &str) -> Result<T> {
        match self.values.remove(name) {
            Some(FieldValue::Integer(value)) => T::try_from(value).map_err(|_| {
                ScrapeError::field_parse(qualify(self.scope, name), value.to_string())
            }),
            _ => Err(self.missing(name)),
        }
    }

    pub fn year(&mut self, name: &str) -> Option<i32> {
        match self.values.remove(name) {
            Some(FieldValue::Year(year)) => year,
            _ => None,
        }
    }
}

/// Builds one record per row node. A row failing a required field is logged
/// and skipped; the remaining rows are still returned.
pub fn collect_rows<T>(
    root: ElementRef<'_>,
    rows: &StructuralPath,
    schema: &Schema,
    base: &Url,
    build: impl Fn(Record) -> Result<T>,
) -> Vec<T> {
    let mut records = Vec::new();

    for (index, row) in rows.locate_all(root).into_iter().enumerate() {
        match schema.extract(row, base).and_then(&build) {
            Ok(record) => records.push(record),
            Err(e) => warn!(scope = schema.scope, row = index, error = %e, "Row skipped"),
        }
    }

    records
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Unreleased titles show up as "TBD", "(TBA)", "" and the like.
fn parse_year(raw: &str) -> Option<i32> {
    raw.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::scrapers::path::Step;
    use scraper::Html;

    const PAGE: &str = r#"
        <div class="card">
            <h2 class="title">Shadow of the Colossus</h2>
            <a class="title-link" href="/games/shadow-of-the-colossus">link</a>
            <span class="year">(2005)</span>
            <span class="id">5678</span>
            <span class="tags">PlayStation 2, PlayStation 3</span>
            <ul><li>NA</li><li> </li><li>EU</li></ul>
            <span class="bad-number">n/a</span>
        </div>
    "#;

    fn path(steps: &[(&str, &str)]) -> StructuralPath {
        StructuralPath::new(steps.iter().map(|(tag, class)| {
            if class.is_empty() {
                Step::tag(tag)
            } else {
                Step::tag(tag).class(class)
            }
        }))
        .unwrap()
    }

    fn base() -> Url {
        Url::parse("https://www.igdb.com/platforms/ps2").unwrap()
    }

    #[test]
    fn coerces_each_kind() {
        let document = Html::parse_fragment(PAGE);
        let schema = Schema::new(
            "",
            vec![
                FieldSpec::required("title", path(&[("h2", "title")])),
                FieldSpec::required("link", path(&[("a", "title-link")]))
                    .attr("href")
                    .coerce(Coercion::Link),
                FieldSpec::optional("year", path(&[("span", "year")])).coerce(Coercion::Year),
                FieldSpec::required("id", path(&[("span", "id")])).coerce(Coercion::Integer),
                FieldSpec::optional("tags", path(&[("span", "tags")])).coerce(Coercion::Split),
                FieldSpec::optional("regions", path(&[("ul", ""), ("li", "")]))
                    .coerce(Coercion::Each),
            ],
        );

        let mut record = schema.extract(document.root_element(), &base()).unwrap();
        assert_eq!(record.text("title").unwrap(), "Shadow of the Colossus");
        assert_eq!(
            record.text("link").unwrap(),
            "https://www.igdb.com/games/shadow-of-the-colossus"
        );
        assert_eq!(record.year("year"), Some(2005));
        assert_eq!(record.integer::<u64>("id").unwrap(), 5678);
        assert_eq!(record.list("tags"), vec!["PlayStation 2", "PlayStation 3"]);
        assert_eq!(record.list("regions"), vec!["NA", "EU"]);
    }

    #[test]
    fn absent_optional_fields_degrade() {
        let document = Html::parse_fragment(PAGE);
        let schema = Schema::new(
            "",
            vec![
                FieldSpec::optional("subtitle", path(&[("h3", "")])),
                FieldSpec::optional("missing-tags", path(&[("span", "nope")]))
                    .coerce(Coercion::Split),
                FieldSpec::optional("missing-year", path(&[("span", "nope")]))
                    .coerce(Coercion::Year),
                FieldSpec::optional("bad-year", path(&[("span", "bad-number")]))
                    .coerce(Coercion::Year),
            ],
        );

        let mut record = schema.extract(document.root_element(), &base()).unwrap();
        assert_eq!(record.text_or_default("subtitle"), "");
        assert!(record.list("missing-tags").is_empty());
        assert_eq!(record.year("missing-year"), None);
        assert_eq!(record.year("bad-year"), None);
    }

    #[test]
    fn reports_first_failing_field_with_scope() {
        let document = Html::parse_fragment(PAGE);
        let schema = Schema::new(
            "hardware",
            vec![
                FieldSpec::required("title", path(&[("h2", "title")])),
                FieldSpec::required("cpu", path(&[("span", "cpu")])),
                FieldSpec::required("memory", path(&[("span", "memory")])),
            ],
        );

        match schema.extract(document.root_element(), &base()) {
            Err(ScrapeError::SchemaMismatch { field }) => assert_eq!(field, "hardware.cpu"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn blank_required_text_counts_as_missing() {
        let document = Html::parse_fragment(
            r#"<div><b class="name"> </b><a class="home" href="">home</a></div>"#,
        );
        let name = || FieldSpec::required("name", path(&[("b", "name")]));
        let home = FieldSpec::required("home", path(&[("a", "home")]))
            .attr("href")
            .coerce(Coercion::Link);

        let strict = Schema::new("", vec![name()]);
        match strict.extract(document.root_element(), &base()) {
            Err(ScrapeError::SchemaMismatch { field }) => assert_eq!(field, "name"),
            other => panic!("unexpected result: {other:?}"),
        }

        let link = Schema::new("", vec![home]);
        match link.extract(document.root_element(), &base()) {
            Err(ScrapeError::SchemaMismatch { field }) => assert_eq!(field, "home"),
            other => panic!("unexpected result: {other:?}"),
        }

        let lenient = Schema::new("", vec![name().allow_blank()]);
        let mut record = lenient.extract(document.root_element(), &base()).unwrap();
        assert_eq!(record.text("name").unwrap(), "");
    }

    #[test]
    fn required_integer_parse_failure_is_fatal() {
        let document = Html::parse_fragment(PAGE);
        let schema = Schema::new(
            "",
            vec![
                FieldSpec::required("id", path(&[("span", "bad-number")]))
                    .coerce(Coercion::Integer),
            ],
        );

        match schema.extract(document.root_element(), &base()) {
            Err(ScrapeError::FieldParse { field, value }) => {
                assert_eq!(field, "id");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn integer_out_of_target_range_is_a_parse_error() {
        let document = Html::parse_fragment(r#"<span class="rank">-3</span>"#);
        let schema = Schema::new(
            "",
            vec![FieldSpec::required("rank", path(&[("span", "rank")])).coerce(Coercion::Integer)],
        );

        let mut record = schema.extract(document.root_element(), &base()).unwrap();
        assert!(matches!(
            record.integer::<u32>("rank"),
            Err(ScrapeError::FieldParse { .. })
        ));
    }

    #[test]
    fn collect_rows_skips_broken_rows() {
        let document = Html::parse_fragment(
            r#"
            <ol>
                <li class="row"><b>one</b></li>
                <li class="row"><i>no title</i></li>
                <li class="row"><b>three</b></li>
            </ol>
            "#,
        );
        let schema = Schema::new("row", vec![FieldSpec::required("title", path(&[("b", "")]))]);
        let titles = collect_rows(
            document.root_element(),
            &path(&[("li", "row")]),
            &schema,
            &base(),
            |mut record| record.text("title"),
        );

        assert_eq!(titles, vec!["one", "three"]);
    }

    #[test]
    fn splits_lists_and_years() {
        assert_eq!(split_list("HDMI"), vec!["HDMI"]);
        assert_eq!(split_list("A, B, C"), vec!["A", "B", "C"]);
        assert!(split_list("").is_empty());

        assert_eq!(parse_year("2004"), Some(2004));
        assert_eq!(parse_year(" (1999) "), Some(1999));
        assert_eq!(parse_year("TBD"), None);
        assert_eq!(parse_year(""), None);
    }
}
