use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::utils::ttl_cache::{Clock, TtlCache};

const CATALOG_OP: &str = "skills";
const COMPLETED_OP: &str = "completed";

/// Catalog entries are objects carrying `id` and `parent_id`; older directory
/// deployments return bare id strings. Only the ids matter here.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Entry { id: String },
    Id(String),
}

impl CatalogEntry {
    fn into_id(self) -> String {
        match self {
            CatalogEntry::Entry { id } => id,
            CatalogEntry::Id(id) => id,
        }
    }
}

/// The per-user completion endpoint returns either a plain set of skill ids
/// or a map of skill id to level; both collapse to the id set.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompletedSkills {
    Ids(Vec<String>),
    Leveled(HashMap<String, i64>),
}

impl CompletedSkills {
    fn into_set(self) -> HashSet<String> {
        match self {
            CompletedSkills::Ids(ids) => ids.into_iter().collect(),
            CompletedSkills::Leveled(map) => map.into_keys().collect(),
        }
    }
}

/// Client for the external skill directory, the source of truth for the
/// skill catalog and per-user completion. Responses are memoized through a
/// TTL cache keyed by (operation, argument); staleness up to the TTL is
/// acceptable for both uses.
#[derive(Clone)]
pub struct SkillsService {
    client: Client,
    base_url: String,
    cache: TtlCache<HashSet<String>>,
}

impl SkillsService {
    pub fn new(base_url: String, cache_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: TtlCache::new(cache_ttl, clock),
        }
    }

    /// The full set of valid skill ids. Write paths validate requested skill
    /// requirements against this; a fetch failure propagates to the caller.
    pub async fn catalog(&self) -> Result<HashSet<String>> {
        if let Some(hit) = self.cache.get(CATALOG_OP, "") {
            return Ok(hit);
        }
        let url = format!("{}/skills", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let entries = response.json::<Vec<CatalogEntry>>().await?;
        let ids: HashSet<String> = entries.into_iter().map(CatalogEntry::into_id).collect();
        self.cache.put(CATALOG_OP, "", ids.clone());
        Ok(ids)
    }

    /// Skill ids the given user has completed.
    pub async fn completed_skills(&self, user_id: Uuid) -> Result<HashSet<String>> {
        let argument = user_id.to_string();
        if let Some(hit) = self.cache.get(COMPLETED_OP, &argument) {
            return Ok(hit);
        }
        let url = format!("{}/skills/{}", self.base_url, user_id);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let completed = response.json::<CompletedSkills>().await?.into_set();
        self.cache.put(COMPLETED_OP, &argument, completed.clone());
        Ok(completed)
    }

    /// Read-path variant for visibility checks and listing filters: a
    /// directory outage degrades to "no skills completed" instead of failing
    /// the request. Contact gating is a UX filter, not a security boundary.
    pub async fn completed_skills_or_empty(&self, user_id: Uuid) -> HashSet<String> {
        match self.completed_skills(user_id).await {
            Ok(completed) => completed,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    user_id = %user_id,
                    "skill directory unavailable, treating completed skills as empty"
                );
                HashSet::new()
            }
        }
    }
}
