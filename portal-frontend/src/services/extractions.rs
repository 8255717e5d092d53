use dashmap::DashMap;

use crate::models::ExtractedJob;

#[derive(Debug, Clone)]
pub struct CachedExtraction {
    pub job_title: String,
    pub data: ExtractedJob,
}

/// Extraction results keyed by job offer id, kept for the life of the process.
///
/// A seeker may only apply to an offer that has been extracted here.
#[derive(Default)]
pub struct ExtractionCache {
    entries: DashMap<i64, CachedExtraction>,
}

impl ExtractionCache {
    pub fn insert(&self, job_offer_id: i64, job_title: impl Into<String>, data: ExtractedJob) {
        self.entries.insert(
            job_offer_id,
            CachedExtraction {
                job_title: job_title.into(),
                data,
            },
        );
    }

    pub fn get(&self, job_offer_id: i64) -> Option<CachedExtraction> {
        self.entries.get(&job_offer_id).map(|entry| entry.clone())
    }

    pub fn contains(&self, job_offer_id: i64) -> bool {
        self.entries.contains_key(&job_offer_id)
    }

    pub fn remove(&self, job_offer_id: i64) {
        self.entries.remove(&job_offer_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
