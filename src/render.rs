//! HTML markup for the elections index and the constituency pages.
//!
//! Rendering never fails and never touches the filesystem: the same view
//! models always produce the same bytes.

use crate::defs::*;
use crate::viewmodel::{format_candidate_block, group_years};

pub const NO_CANDIDATES: &str = "沒有候選人";

const BACK_LINK: &str = "< 返回";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// append-only markup buffer
struct Html {
    buf: String,
}

impl Html {
    fn new() -> Html {
        Html {
            buf: String::with_capacity(8 * 1024),
        }
    }

    fn push<S: AsRef<str>>(&mut self, s: S) {
        self.buf.push_str(s.as_ref());
    }

    fn text(&mut self, s: &str) {
        self.buf.push_str(&escape(s));
    }

    fn link(&mut self, href: &str, text: &str) {
        self.push("<a href=\"");
        self.text(href);
        self.push("\">");
        self.text(text);
        self.push("</a>");
    }

    fn finish(self) -> String {
        self.buf
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    title: &'a str,
    base_url: &'a str,
}

impl<'a> Renderer<'a> {
    /// `base_url` must end in '/'.
    pub fn new(title: &'a str, base_url: &'a str) -> Renderer<'a> {
        Renderer { title, base_url }
    }

    fn open_document(&self, w: &mut Html, heading: &str) {
        w.push("<!DOCTYPE html><html lang=\"zh-Hant\"><head><meta charset=\"utf-8\">");
        w.push("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
        w.push("<title>");
        if heading != self.title {
            w.text(heading);
            w.push(" | ");
        }
        w.text(self.title);
        w.push("</title></head><body><main>");
    }

    fn close_document(&self, w: &mut Html) {
        w.push("</main></body></html>\n");
    }

    pub fn index_page(&self, elections: &[Election]) -> String {
        let mut w = Html::new();
        self.open_document(&mut w, self.title);
        w.link(self.base_url, BACK_LINK);
        w.push("<h1>");
        w.text(self.title);
        w.push("</h1>");
        self.years_list(&mut w, elections);
        self.election_blocks(&mut w, elections);
        self.close_document(&mut w);
        w.finish()
    }

    fn years_list(&self, w: &mut Html, elections: &[Election]) {
        w.push("<div><ul class=\"years-list\">");
        for year in group_years(elections) {
            w.push("<li>");
            w.link(&format!("#year-{}", year), &year.to_string());
            w.push("</li>");
        }
        w.push("</ul></div>");
    }

    fn election_blocks(&self, w: &mut Html, elections: &[Election]) {
        w.push("<div class=\"election-blocks\">");
        let mut seen = Vec::new();
        for election in elections {
            // anchor the first block of each year for the years list
            if seen.contains(&election.year) {
                w.push("<div>");
            } else {
                seen.push(election.year);
                w.push(format!("<div id=\"year-{}\">", election.year));
            }
            w.push("<h3 class=\"election-title\">");
            w.text(&election.display_title);
            w.push("</h3>");
            self.regions_links(w, &election.regions, &election.url_prefix());
            w.push("</div>");
        }
        w.push("</div>");
    }

    fn regions_links(&self, w: &mut Html, regions: &[Region], url_prefix: &str) {
        w.push("<ul class=\"regions-links\">");
        for region in regions {
            w.push("<li class=\"region-link\">");
            match region.constituencies.first() {
                Some(first) => {
                    let href = format!(
                        "{}{}/regions/{}/constituencies/{}",
                        self.base_url, url_prefix, region.name, first.name
                    );
                    w.link(&href, &region.name);
                }
                None => w.text(&region.name),
            }
            w.push("</li>");
        }
        w.push("</ul>");
    }

    fn constituencies_of_region(&self, w: &mut Html, page: &ConstituencyPage) {
        w.push("<ul class=\"constituencies-links\">");
        for constituency in page.constituencies_of_region {
            let href = format!(
                "{}elections/{}/regions/{}/constituencies/{}",
                self.base_url, page.election.slug, page.region_name, constituency.name
            );
            w.push("<li class=\"constituency-link\">");
            w.link(&href, &constituency.name);
            w.push("</li>");
        }
        w.push("</ul>");
    }

    pub fn constituency_page(&self, page: &ConstituencyPage) -> String {
        let mut w = Html::new();
        let heading = format!("{} {}", page.election.display_title, page.constituency.name);
        self.open_document(&mut w, &heading);
        // the page heading carries the election's source name, as the links do
        w.push("<div><h1>");
        w.text(&page.election.raw_name);
        w.push("</h1>");
        self.regions_links(&mut w, &page.election.regions, &page.url_prefix);
        self.constituencies_of_region(&mut w, page);
        w.push("<h1>");
        w.text(&page.constituency.name);
        w.push("</h1>");
        w.push(candidate_blocks(page.constituency.candidates.as_ref().map(Vec::as_slice)));
        w.push("</div>");
        self.close_document(&mut w);
        w.finish()
    }
}

/// Candidate blocks for one constituency; `None` renders the
/// no-candidates notice instead of any blocks.
pub fn candidate_blocks(candidates: Option<&[Candidate]>) -> String {
    let mut w = Html::new();
    match candidates {
        None => {
            w.push("<div>");
            w.text(NO_CANDIDATES);
            w.push("</div>");
        }
        Some(candidates) => {
            w.push("<div class=\"candidate-blocks\">");
            for candidate in candidates {
                candidate_block(&mut w, candidate);
            }
            w.push("</div>");
        }
    }
    w.finish()
}

fn candidate_block(w: &mut Html, candidate: &Candidate) {
    let block = format_candidate_block(candidate);
    w.push("<div class=\"candidate-block\"><h6>");
    w.text(&candidate.party_name);
    w.push("</h6><h1 class=\"candidate-name\">");
    w.text(&candidate.name);
    w.text(block.elected_marker);
    w.push("</h1><h6>");
    w.text(&format!(
        "得票數:{} / 得票率: {}",
        candidate.num_of_vote, candidate.rate_of_vote
    ));
    w.push("</h6>");
    finance_block(w, &block.finance);
    w.push("</div>");
}

fn finance_block(w: &mut Html, finance: &Finance) {
    w.push("<div class=\"candidate-finance-block\">");
    finance_side(w, "總收入", &finance.income);
    finance_side(w, "總支出", &finance.outcome);
    w.push("</div>");
}

fn finance_side(w: &mut Html, label: &str, side: &FinanceSide) {
    w.push("<div class=\"candidate-finance-detail-block\"><div></div><div>");
    w.text(&format!("{}: {}", label, side.total));
    w.push("</div>");
    if !side.items.is_empty() {
        w.push("<ul class=\"finance-items\">");
        for item in &side.items {
            w.push("<li>");
            w.text(&format!("{}: {}", item.name, item.amount));
            w.push("</li>");
        }
        w.push("</ul>");
    }
    w.push("</div>");
}
