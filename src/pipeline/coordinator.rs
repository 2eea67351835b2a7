//! Pipeline coordinator - main run orchestration logic
//!
//! The coordinator walks the page list strictly in order, in two phases.
//! First every page is fetched and extracted; a failure there skips the
//! page and the run continues. Then the surviving pages are converted and
//! assembled, so section anchors and the link-rewrite index only ever
//! cover pages that made it into the document. Only configuration,
//! page-list discovery, and the final write can fail the whole run.

use crate::assemble::{write_document, Assembler, DocumentMeta, HeadingEntry, MarkdownSection};
use crate::config::{Config, PageEntry};
use crate::convert::{
    convert_blocks, normalize_page_url, render_heading, slugify, ConvertContext, Slugger,
};
use crate::discover::discover_pages;
use crate::extract::{extract_content, Block};
use crate::fetch::{build_http_client, fetch_page};
use crate::StitchError;
use reqwest::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// Markdown level of each page's lead heading; content headings shift below it
const LEAD_HEADING_LEVEL: u8 = 2;

/// Overall state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created but not started
    Idle,

    /// Iterating the page list
    Running,

    /// Output file written
    Completed,

    /// Unrecoverable failure (config, page-list discovery, or final write)
    Failed,
}

/// Outcome of processing a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page was converted and appended to the document
    Appended,

    /// Page failed somewhere in fetch/extract/convert and was skipped
    Skipped { reason: String },
}

impl PageOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, Self::Appended)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Summary of a completed run
#[derive(Debug)]
pub struct RunReport {
    /// Pages in the plan, in processing order, with their outcomes
    pub pages: Vec<(String, PageOutcome)>,

    /// Path the document was written to
    pub output_path: PathBuf,
}

impl RunReport {
    pub fn appended(&self) -> usize {
        self.pages.iter().filter(|(_, o)| o.is_appended()).count()
    }

    pub fn skipped(&self) -> usize {
        self.pages.iter().filter(|(_, o)| o.is_skipped()).count()
    }
}

/// A planned page: title and resolved URL
struct PlannedPage {
    title: String,
    url: Url,
}

/// A page that survived fetch and extraction, with its section anchor
struct StagedPage {
    title: String,
    url: Url,
    anchor: String,
    blocks: Vec<Block>,
}

/// Main pipeline coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    base_url: Url,
    date: String,
    state: RunState,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration
    /// * `date` - Frontmatter date (YYYY-MM-DD); injected so runs over
    ///   identical input produce identical output in tests
    pub fn new(config: Config, date: String) -> Result<Self, StitchError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let client = build_http_client(&config.fetch)?;

        Ok(Self {
            config,
            client,
            base_url,
            date,
            state: RunState::Idle,
        })
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs the pipeline to completion
    pub async fn run(&mut self) -> Result<RunReport, StitchError> {
        self.state = RunState::Running;

        let planned = match self.plan().await {
            Ok(planned) => planned,
            Err(e) => {
                self.state = RunState::Failed;
                return Err(e);
            }
        };

        tracing::info!("Processing {} pages", planned.len());

        // Phase one: fetch and extract every page, recording skips.
        let mut outcomes = Vec::with_capacity(planned.len());
        let mut survivors = Vec::new();
        for page in planned {
            match self.load_page(&page).await {
                Ok(blocks) => {
                    outcomes.push((page.url.to_string(), PageOutcome::Appended));
                    survivors.push((page, blocks));
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", page.url, e);
                    outcomes.push((
                        page.url.to_string(),
                        PageOutcome::Skipped {
                            reason: e.to_string(),
                        },
                    ));
                }
            }
        }

        // Section anchors exist only for pages that made it through, so a
        // link targeting a skipped page keeps its absolute URL and a body
        // heading sharing a skipped page's title keeps the bare slug.
        let mut slugger = Slugger::new();
        let staged: Vec<StagedPage> = survivors
            .into_iter()
            .map(|(page, blocks)| StagedPage {
                anchor: slugger.reserve(&slugify(&page.title)),
                title: page.title,
                url: page.url,
                blocks,
            })
            .collect();

        let link_index: HashMap<String, String> = staged
            .iter()
            .map(|p| (normalize_page_url(&p.url), p.anchor.clone()))
            .collect();

        let mut assembler = Assembler::new(DocumentMeta {
            title: self.config.output.title.clone(),
            date: self.date.clone(),
        });

        // Phase two: convert in list order against the final link index.
        for page in &staged {
            let section = self.convert_page(page, &mut slugger, &link_index);
            assembler.add_section(section);
        }

        let output_path = PathBuf::from(&self.config.output.directory)
            .join(&self.config.output.filename);

        let document = assembler.finalize();
        if let Err(e) = write_document(&document, &output_path) {
            self.state = RunState::Failed;
            return Err(e.into());
        }

        self.state = RunState::Completed;
        tracing::info!(
            "Wrote {} sections to {}",
            assembler.section_count(),
            output_path.display()
        );

        Ok(RunReport {
            pages: outcomes,
            output_path,
        })
    }

    /// Plans the page list with URLs resolved against the base URL
    ///
    /// Static `[[pages]]` entries win over index discovery when both are
    /// configured. Section anchors are assigned later, once the set of
    /// pages that actually fetched and extracted is known.
    async fn plan(&self) -> Result<Vec<PlannedPage>, StitchError> {
        let entries = self.plan_entries().await?;

        let mut planned = Vec::with_capacity(entries.len());
        for entry in entries {
            let url = self.base_url.join(&entry.url)?;
            planned.push(PlannedPage {
                title: entry.title,
                url,
            });
        }

        Ok(planned)
    }

    async fn plan_entries(&self) -> Result<Vec<PageEntry>, StitchError> {
        if !self.config.pages.is_empty() {
            tracing::debug!("Using static page list ({} entries)", self.config.pages.len());
            return Ok(self.config.pages.clone());
        }

        // Validation guarantees index_path is present when pages is empty
        let index_path = self.config.site.index_path.as_deref().unwrap_or("/");
        let index_url = self.base_url.join(index_path)?;

        tracing::info!("Discovering pages from {}", index_url);
        let index_html = fetch_page(&self.client, &index_url).await?;
        let pages = discover_pages(&index_html, &self.base_url, &self.config.site.nav_selector)?;
        Ok(pages)
    }

    /// Fetches and extracts one page
    async fn load_page(&self, page: &PlannedPage) -> Result<Vec<Block>, StitchError> {
        tracing::debug!("Fetching {}", page.url);
        let html = fetch_page(&self.client, &page.url).await?;

        tracing::debug!("Extracting {}", page.url);
        let blocks = extract_content(&html, &self.config.site.content_selector)?;
        Ok(blocks)
    }

    /// Converts one staged page into its markdown section
    ///
    /// The returned section starts with the page's lead heading (carrying
    /// its reserved anchor) followed by the converted content, shifted one
    /// level down.
    fn convert_page(
        &self,
        page: &StagedPage,
        slugger: &mut Slugger,
        link_index: &HashMap<String, String>,
    ) -> MarkdownSection {
        tracing::debug!("Converting {}", page.url);
        let ctx = ConvertContext {
            page_url: &page.url,
            level_offset: LEAD_HEADING_LEVEL - 1,
            link_index,
        };
        let converted = convert_blocks(&page.blocks, slugger, &ctx);

        let mut headings = Vec::with_capacity(converted.headings.len() + 1);
        headings.push(HeadingEntry {
            text: page.title.clone(),
            level: LEAD_HEADING_LEVEL,
            anchor: page.anchor.clone(),
        });
        headings.extend(converted.headings);

        let mut body = render_heading(LEAD_HEADING_LEVEL, &page.title, &page.anchor);
        body.push('\n');
        body.push_str(&converted.body);

        MarkdownSection { headings, body }
    }
}
