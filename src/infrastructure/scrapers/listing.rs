use super::path::{Step, StructuralPath};
use super::schema::{collect_rows, Coercion, FieldSpec, Schema};
use super::ListingScraper;
use crate::domain::{Game, RankedGame};
use crate::error::Result;
use scraper::Html;
use url::Url;

fn title_link() -> Result<StructuralPath> {
    StructuralPath::new([Step::tag("a").class("game-title")])
}

fn release_year() -> Result<StructuralPath> {
    StructuralPath::new([Step::tag("span").class("release-year")])
}

/// Rows of the `/top-100/games/platform/{id}` table.
#[derive(Debug, Clone)]
pub struct TopRankedScraper {
    rows: StructuralPath,
    schema: Schema,
}

impl TopRankedScraper {
    pub fn new() -> Result<Self> {
        let schema = Schema::new(
            "top_ranked",
            vec![
                FieldSpec::required("rank", StructuralPath::new([Step::tag("td").class("rank")])?)
                    .coerce(Coercion::Integer),
                FieldSpec::required("id", title_link()?)
                    .attr("data-game-id")
                    .coerce(Coercion::Integer),
                FieldSpec::required("title", title_link()?),
                FieldSpec::required("link", title_link()?)
                    .attr("href")
                    .coerce(Coercion::Link),
                FieldSpec::optional("year", release_year()?).coerce(Coercion::Year),
                FieldSpec::required("score", StructuralPath::new([Step::tag("td").class("score")])?)
                    .coerce(Coercion::Integer),
            ],
        );

        Ok(Self {
            rows: StructuralPath::new([
                Step::tag("table").class("top-100"),
                Step::tag("tr").class("top-100-row"),
            ])?,
            schema,
        })
    }
}

impl ListingScraper for TopRankedScraper {
    type Row = RankedGame;

    fn extract_rows(&self, document: &Html, page: &Url) -> Vec<RankedGame> {
        collect_rows(document.root_element(), &self.rows, &self.schema, page, |mut record| {
            Ok(RankedGame {
                rank: record.integer("rank")?,
                id: record.integer("id")?,
                title: record.text("title")?,
                link: record.text("link")?,
                year: record.year("year"),
                score: record.integer("score")?,
            })
        })
    }
}

/// Tiles of one `/platforms/{id}/games?page={n}` catalog page.
#[derive(Debug, Clone)]
pub struct CatalogScraper {
    rows: StructuralPath,
    schema: Schema,
}

impl CatalogScraper {
    pub fn new() -> Result<Self> {
        let schema = Schema::new(
            "catalog",
            vec![
                FieldSpec::required("title", title_link()?),
                FieldSpec::required("link", title_link()?)
                    .attr("href")
                    .coerce(Coercion::Link),
                FieldSpec::optional("year", release_year()?).coerce(Coercion::Year),
                FieldSpec::optional(
                    "platforms",
                    StructuralPath::new([Step::tag("span").class("platform-tags")])?,
                )
                .coerce(Coercion::Split),
            ],
        );

        Ok(Self {
            rows: StructuralPath::new([
                Step::tag("div").class("game-list"),
                Step::tag("div").class("game-tile"),
            ])?,
            schema,
        })
    }
}

impl ListingScraper for CatalogScraper {
    type Row = Game;

    fn extract_rows(&self, document: &Html, page: &Url) -> Vec<Game> {
        collect_rows(document.root_element(), &self.rows, &self.schema, page, |mut record| {
            Ok(Game {
                title: record.text("title")?,
                link: record.text("link")?,
                year: record.year("year"),
                platforms: record.list("platforms"),
            })
        })
    }
}
