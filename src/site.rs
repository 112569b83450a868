use std::path::{Component, Path, PathBuf};

use num_format::{Locale, ToFormattedString};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::configuration::Site;
use crate::data;
use crate::data::candidates::CandidateTable;
use crate::defs::*;
use crate::error::{Error, Result};
use crate::output::{PageWriter, SiteOutput};
use crate::render::Renderer;
use crate::viewmodel::{build_election, RegionRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildSummary {
    pub elections: usize,
    pub pages: usize,
    pub candidates: usize,
}

pub fn index_path() -> PathBuf {
    PathBuf::from("elections").join("index.html")
}

// a name must map to exactly one directory level under the output root
fn segment(name: &str) -> Result<&Path> {
    let path = Path::new(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(|c: char| c == '/' || c == '\\') => {
            Ok(path)
        }
        _ => Err(Error::Config(format!(
            "{:?} cannot be used as a page directory name",
            name
        ))),
    }
}

pub fn page_path(page: &ConstituencyPage) -> Result<PathBuf> {
    Ok(PathBuf::from("elections")
        .join(segment(&page.election.slug)?)
        .join("regions")
        .join(segment(page.region_name)?)
        .join("constituencies")
        .join(segment(&page.constituency.name)?)
        .join("index.html"))
}

/// Builds the election view models and attaches each constituency's
/// reported candidates.
pub fn build_elections(
    records: &[ElectionRecord],
    rule: RegionRule,
    candidates: &CandidateTable,
) -> Vec<Election> {
    let mut elections: Vec<Election> = records.iter().map(|r| build_election(r, rule)).collect();
    for election in elections.iter_mut() {
        for region in election.regions.iter_mut() {
            for constituency in region.constituencies.iter_mut() {
                constituency.candidates =
                    candidates.get(&election.raw_name, &region.name, &constituency.name);
            }
        }
    }
    elections
}

/// One page per constituency, in election, region, constituency order.
pub fn plan(elections: &[Election]) -> Vec<ConstituencyPage> {
    let mut pages = Vec::new();
    for election in elections {
        let url_prefix = election.url_prefix();
        for region in &election.regions {
            for constituency in &region.constituencies {
                pages.push(ConstituencyPage {
                    election,
                    url_prefix: url_prefix.clone(),
                    region_name: &region.name,
                    constituencies_of_region: &region.constituencies,
                    constituency,
                });
            }
        }
    }
    pages
}

pub fn render_pages(
    renderer: &Renderer,
    pages: &[ConstituencyPage],
) -> Result<Vec<(PathBuf, String)>> {
    pages
        .par_iter()
        .map(|page| -> Result<(PathBuf, String)> {
            Ok((page_path(page)?, renderer.constituency_page(page)))
        })
        .collect()
}

pub fn build(site: &Site) -> Result<BuildSummary> {
    let mut output = SiteOutput::new(&site.output)?;
    let summary = build_with(site, &mut output)?;
    info!(
        "wrote {} files to {}",
        output.written().to_formatted_string(&Locale::en),
        output.root().display()
    );
    Ok(summary)
}

pub fn build_with<W: PageWriter>(site: &Site, writer: &mut W) -> Result<BuildSummary> {
    let records = data::elections::load(&site.elections)?;
    let candidates = match site.candidates {
        Some(ref path) => data::candidates::load(path)?,
        None => CandidateTable::new(),
    };
    let elections = build_elections(&records, site.region_rule, &candidates);

    let renderer = Renderer::new(&site.title, &site.base_url);
    let pages = plan(&elections);
    debug!("rendering {} constituency pages", pages.len());
    let rendered = render_pages(&renderer, &pages)?;
    writer.write_page(&index_path(), &renderer.index_page(&elections))?;
    for (path, html) in rendered {
        writer.write_page(&path, &html)?;
    }
    writer.write_model(&elections)?;

    let summary = BuildSummary {
        elections: elections.len(),
        pages: pages.len(),
        candidates: pages
            .iter()
            .filter_map(|p| p.constituency.candidates.as_ref())
            .map(Vec::len)
            .sum(),
    };
    info!(
        "built {} elections: {} constituency pages, {} candidates",
        summary.elections.to_formatted_string(&Locale::en),
        summary.pages.to_formatted_string(&Locale::en),
        summary.candidates.to_formatted_string(&Locale::en)
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::candidates::CandidateKey;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MemoryOutput {
        pages: BTreeMap<PathBuf, String>,
        model: Vec<Election>,
    }

    impl PageWriter for MemoryOutput {
        fn write_page(&mut self, path: &Path, html: &str) -> Result<()> {
            self.pages.insert(path.to_path_buf(), html.to_string());
            Ok(())
        }

        fn write_model(&mut self, elections: &[Election]) -> Result<()> {
            self.model = elections.to_vec();
            Ok(())
        }
    }

    fn records() -> Vec<ElectionRecord> {
        vec![
            ElectionRecord {
                year: 2016,
                name: "2016 Legislator Election".to_string(),
                regions: vec![
                    RawRegion { name: "全國".to_string() },
                    RawRegion { name: "臺北市".to_string() },
                ],
            },
            ElectionRecord {
                year: 2016,
                name: "2016 President Election".to_string(),
                regions: vec![RawRegion { name: "全國".to_string() }],
            },
        ]
    }

    fn table() -> CandidateTable {
        let mut table = CandidateTable::new();
        table.push(
            CandidateKey::new("2016 Legislator Election", "臺北市", "第01選區"),
            Candidate {
                name: "甲".to_string(),
                party_name: "甲黨".to_string(),
                num_of_vote: Tally::Text("100".to_string()),
                rate_of_vote: "50%".to_string(),
                is_elected: true,
                finance: None,
            },
        );
        table
    }

    #[test]
    fn candidates_attach_by_key() {
        let elections = build_elections(&records(), RegionRule::Exact, &table());
        assert_eq!(elections[0].regions[0].constituencies[0].candidates, None);
        let taipei = &elections[0].regions[1].constituencies[0];
        assert_eq!(taipei.name, "第01選區");
        assert_eq!(taipei.candidates.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn plan_has_one_page_per_constituency() {
        let elections = build_elections(&records(), RegionRule::Exact, &table());
        let pages = plan(&elections);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].url_prefix, "elections/2016-legislator-election");
        assert_eq!(pages[1].region_name, "臺北市");
        assert_eq!(pages[1].constituencies_of_region.len(), 1);
        assert_eq!(
            page_path(&pages[1]).unwrap(),
            Path::new("elections/2016-legislator-election/regions/臺北市/constituencies/第01選區/index.html")
        );
        assert_eq!(pages[2].election.slug, "2016-president-election");
    }

    #[test]
    fn legacy_rule_changes_page_paths() {
        let elections = build_elections(&records(), RegionRule::Legacy, &table());
        let pages = plan(&elections);
        assert_eq!(pages[1].constituency.name, "全國");
        // the legacy layout never reaches the first-constituency key
        assert_eq!(pages[1].constituency.candidates, None);
    }

    #[test]
    fn rendered_pages_keep_plan_order() {
        let elections = build_elections(&records(), RegionRule::Exact, &table());
        let pages = plan(&elections);
        let renderer = Renderer::new("選舉金流", "/");
        let rendered = render_pages(&renderer, &pages).unwrap();
        let paths: Vec<PathBuf> = pages.iter().map(|p| page_path(p).unwrap()).collect();
        let rendered_paths: Vec<PathBuf> = rendered.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(paths, rendered_paths);
        assert!(rendered[0].1.contains("沒有候選人"));
        assert!(rendered[1].1.contains("甲(當選)"));
    }

    #[test]
    fn build_writes_index_pages_and_model() {
        let dir = tempfile::tempdir().unwrap();
        let elections = dir.path().join("elections.json");
        std::fs::write(
            &elections,
            r#"[{"year": 2016, "name": "2016 President Election", "regions": [{"name": "全國"}]},
                {"year": 2016, "name": null, "regions": []}]"#,
        )
        .unwrap();
        let site = Site::new(elections, dir.path().join("public"));

        let mut out = MemoryOutput::default();
        let summary = build_with(&site, &mut out).unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                elections: 1,
                pages: 1,
                candidates: 0
            }
        );
        assert!(out.pages.contains_key(&index_path()));
        assert_eq!(out.pages.len(), 2);
        assert_eq!(out.model.len(), 1);
        assert_eq!(out.model[0].display_title, "總統選舉");
    }

    fn single_region(name: &str, region: &str) -> Vec<Election> {
        let records = vec![ElectionRecord {
            year: 2016,
            name: name.to_string(),
            regions: vec![RawRegion { name: region.to_string() }],
        }];
        build_elections(&records, RegionRule::Exact, &CandidateTable::new())
    }

    #[test]
    fn names_that_leave_their_directory_are_rejected() {
        for region in &["../../../escaped", "/etc", "a/b", "..", ".", ""] {
            let elections = single_region("X", region);
            let pages = plan(&elections);
            match page_path(&pages[0]) {
                Err(Error::Config(_)) => {}
                other => panic!("{:?} gave {:?}", region, other),
            }
        }
        let elections = single_region("2016/2020 Election", "臺北市");
        assert!(page_path(&plan(&elections)[0]).is_err());
    }

    #[test]
    fn escaping_region_fails_the_build_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let elections = dir.path().join("elections.json");
        std::fs::write(
            &elections,
            r#"[{"year": 2016, "name": "X", "regions": [{"name": "../../../../../escaped"}]}]"#,
        )
        .unwrap();
        let site = Site::new(elections, dir.path().join("a/public"));

        let mut out = MemoryOutput::default();
        match build_with(&site, &mut out) {
            Err(Error::Config(msg)) => assert!(msg.contains("escaped"), "{}", msg),
            other => panic!("expected a config error, got {:?}", other),
        }
        assert!(out.pages.is_empty());
        assert!(!dir.path().join("escaped").exists());
    }
}
