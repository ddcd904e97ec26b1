use super::path::{Step, StructuralPath};
use super::schema::{collect_rows, Coercion, FieldSpec, Record, Schema};
use crate::domain::{PlatformHardware, PlatformMeta, PlatformVersion};
use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

/// Position of each value cell in the platform info table.
const ALT_NAME_ROW: usize = 0;
const GENERATION_ROW: usize = 1;
const PLATFORM_TYPE_ROW: usize = 2;
const PRODUCT_FAMILY_ROW: usize = 3;

/// Builds `PlatformMeta` records from `/platforms/{id}` pages.
#[derive(Debug, Clone)]
pub struct PlatformPageScraper {
    meta: Schema,
    hardware_block: StructuralPath,
    hardware: Schema,
    version_rows: StructuralPath,
    version: Schema,
}

fn path(steps: impl IntoIterator<Item = Step>) -> Result<StructuralPath> {
    StructuralPath::new(steps)
}

fn info_cell(row: usize) -> Result<StructuralPath> {
    Ok(path([Step::tag("table").class("platform-info"), Step::tag("td")])?.at(row))
}

fn company_link(role: &str) -> Result<StructuralPath> {
    path([
        Step::tag("div").class("platform-companies"),
        Step::tag("a").attr("data-role", role).has_attr("data-company-id"),
    ])
}

fn hardware_cell(spec: &str) -> Result<StructuralPath> {
    path([Step::tag("tr").attr("data-spec", spec), Step::tag("td")])
}

impl PlatformPageScraper {
    pub fn new() -> Result<Self> {
        let meta = Schema::new(
            "",
            vec![
                FieldSpec::required("name", path([Step::tag("h1").class("banner-title")])?),
                FieldSpec::required(
                    "description",
                    path([Step::tag("div").class("platform-summary")])?,
                ),
                FieldSpec::required("alt_name", info_cell(ALT_NAME_ROW)?),
                FieldSpec::required("generation", info_cell(GENERATION_ROW)?),
                FieldSpec::required("platform_type", info_cell(PLATFORM_TYPE_ROW)?),
                FieldSpec::required("product_family", info_cell(PRODUCT_FAMILY_ROW)?),
                FieldSpec::required("manufacturer_id", company_link("manufacturer")?)
                    .attr("data-company-id")
                    .coerce(Coercion::Integer),
                FieldSpec::required("developers_id", company_link("developer")?)
                    .attr("data-company-id")
                    .coerce(Coercion::Integer),
                FieldSpec::optional(
                    "release_dates",
                    path([Step::tag("ul").class("release-dates"), Step::tag("li")])?,
                )
                .coerce(Coercion::Each),
                FieldSpec::optional(
                    "introduction_price",
                    path([Step::tag("ul").class("introduction-prices"), Step::tag("li")])?,
                )
                .coerce(Coercion::Each),
            ],
        );

        // Text cells must exist but may be blank; list cells may be missing.
        let hardware = Schema::new(
            "hardware",
            vec![
                FieldSpec::required("operating_system", hardware_cell("operating-system")?)
                    .allow_blank(),
                FieldSpec::required("cpu", hardware_cell("cpu")?).allow_blank(),
                FieldSpec::required("memory", hardware_cell("memory")?).allow_blank(),
                FieldSpec::optional("storage", hardware_cell("storage")?).coerce(Coercion::Split),
                FieldSpec::required("graphics", hardware_cell("graphics")?).allow_blank(),
                FieldSpec::required("sound", hardware_cell("sound")?).allow_blank(),
                FieldSpec::required("online_service", hardware_cell("online-service")?)
                    .allow_blank(),
                FieldSpec::optional("output", hardware_cell("output")?).coerce(Coercion::Split),
                FieldSpec::optional("supported_resolutions", hardware_cell("resolutions")?)
                    .coerce(Coercion::Split),
                FieldSpec::optional("connectivity", hardware_cell("connectivity")?)
                    .coerce(Coercion::Split),
            ],
        );

        let version = Schema::new(
            "other_versions",
            vec![
                FieldSpec::required("name", path([Step::tag("h3")])?),
                FieldSpec::optional("description", path([Step::tag("p")])?),
                FieldSpec::required("link", path([Step::tag("a").has_attr("href")])?)
                    .attr("href")
                    .coerce(Coercion::Link),
            ],
        );

        Ok(Self {
            meta,
            hardware_block: path([Step::tag("div").class("platform-hardware")])?,
            hardware,
            version_rows: path([
                Step::tag("div").class("platform-versions"),
                Step::tag("div").class("platform-version"),
            ])?,
            version,
        })
    }

    pub fn parse(&self, html: &str, page: &Url) -> Result<PlatformMeta> {
        let document = Html::parse_document(html);
        self.extract(&document, page)
    }

    /// Every section is evaluated before any failure is reported, so the
    /// logs name all broken fields of a page, not just the first one.
    pub fn extract(&self, document: &Html, page: &Url) -> Result<PlatformMeta> {
        let root = document.root_element();

        let meta = self.meta.extract(root, page);
        let hardware = self.extract_hardware(root, page);
        let versions = |mut record: Record| -> Result<PlatformVersion> {
            Ok(PlatformVersion {
                name: record.text("name")?,
                description: record.text_or_default("description"),
                link: record.text("link")?,
            })
        };
        let other_versions = collect_rows(root, &self.version_rows, &self.version, page, versions);

        let mut meta = meta?;
        let hardware = hardware?;
        debug!(versions = other_versions.len(), "Platform page extracted");

        Ok(PlatformMeta {
            name: meta.text("name")?,
            description: meta.text("description")?,
            alt_name: meta.text("alt_name")?,
            manufacturer_id: meta.integer("manufacturer_id")?,
            developers_id: meta.integer("developers_id")?,
            generation: meta.text("generation")?,
            platform_type: meta.text("platform_type")?,
            product_family: meta.text("product_family")?,
            release_dates: meta.list("release_dates"),
            introduction_price: meta.list("introduction_price"),
            hardware,
            other_versions,
        })
    }

    fn extract_hardware(&self, root: ElementRef<'_>, page: &Url) -> Result<PlatformHardware> {
        let block = self
            .hardware_block
            .locate(root)
            .ok_or_else(|| ScrapeError::schema_mismatch("hardware"))?;

        let record = self.hardware.extract(block, page)?;
        hardware_from(record)
    }
}

fn hardware_from(mut record: Record) -> Result<PlatformHardware> {
    Ok(PlatformHardware {
        operating_system: record.text("operating_system")?,
        cpu: record.text("cpu")?,
        memory: record.text("memory")?,
        storage: record.list("storage"),
        graphics: record.text("graphics")?,
        sound: record.text("sound")?,
        online_service: record.text("online_service")?,
        output: record.list("output"),
        supported_resolutions: record.list("supported_resolutions"),
        connectivity: record.list("connectivity"),
    })
}
