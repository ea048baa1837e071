//! Summary counts for the admin dashboard.

use std::fmt;

use crate::error::Error;
use crate::models::LicenseType;
use crate::normalize::normalize_license;
use crate::store::{CollectionReader, collections};

/// Count for one collection. A zero is a real zero; `Unavailable` means the
/// read itself failed and the dashboard should render "—" for this card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionCount {
    Available(u64),
    Unavailable,
}

impl CollectionCount {
    pub fn value(&self) -> Option<u64> {
        match self {
            CollectionCount::Available(n) => Some(*n),
            CollectionCount::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, CollectionCount::Unavailable)
    }
}

impl fmt::Display for CollectionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionCount::Available(n) => write!(f, "{}", n),
            CollectionCount::Unavailable => write!(f, "—"),
        }
    }
}

/// Per-type license counts. Records whose type cannot be derived count
/// toward `total` only, so `trial + paid + unknown() == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LicenseTally {
    pub total: u64,
    pub trial: u64,
    pub paid: u64,
}

impl LicenseTally {
    /// Records that resolved to neither trial nor paid.
    pub fn unknown(&self) -> u64 {
        self.total - self.trial - self.paid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseCounts {
    Available(LicenseTally),
    Unavailable,
}

impl LicenseCounts {
    pub fn tally(&self) -> Option<LicenseTally> {
        match self {
            LicenseCounts::Available(t) => Some(*t),
            LicenseCounts::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, LicenseCounts::Unavailable)
    }
}

/// All dashboard cards in one struct.
#[derive(Debug, Clone, Copy)]
pub struct AdminCounts {
    pub ideas: CollectionCount,
    pub messages: CollectionCount,
    pub licenses: LicenseCounts,
}

impl AdminCounts {
    /// Summary error naming the sources that could not be fetched, for the
    /// dashboard's error banner. `None` when every read succeeded.
    pub fn partial_error(&self) -> Option<Error> {
        let mut failed = Vec::new();
        if self.ideas.is_unavailable() {
            failed.push(collections::IDEAS);
        }
        if self.messages.is_unavailable() {
            failed.push(collections::MESSAGES);
        }
        if self.licenses.is_unavailable() {
            failed.push(collections::LICENSES);
        }
        if failed.is_empty() {
            None
        } else {
            Some(Error::PartialData(format!(
                "could not fetch counts for: {}",
                failed.join(", ")
            )))
        }
    }
}

/// Exact count of one collection. A failed read downgrades to
/// `Unavailable` instead of propagating.
pub async fn count_collection(reader: &CollectionReader, name: &str) -> CollectionCount {
    match reader.read(name, None).await {
        Ok(docs) => CollectionCount::Available(docs.len() as u64),
        Err(e) => {
            tracing::warn!(collection = %name, error = %e, "count unavailable");
            CollectionCount::Unavailable
        }
    }
}

/// Trial/paid split for the licenses collection.
///
/// The split applies the canonical license-type derivation to every
/// document, so legacy `isTrial`/`plan` encodings land in the right bucket;
/// a backend count with a `licenseType == "trial"` filter would miss them.
pub async fn license_counts(reader: &CollectionReader) -> LicenseCounts {
    match reader.read(collections::LICENSES, None).await {
        Ok(docs) => {
            let mut tally = LicenseTally::default();
            for doc in &docs {
                tally.total += 1;
                match normalize_license(doc).license_type {
                    LicenseType::Trial => tally.trial += 1,
                    LicenseType::Paid => tally.paid += 1,
                    LicenseType::Unknown => {}
                }
            }
            LicenseCounts::Available(tally)
        }
        Err(e) => {
            tracing::warn!(collection = collections::LICENSES, error = %e, "license counts unavailable");
            LicenseCounts::Unavailable
        }
    }
}

/// The dashboard's reads, issued concurrently and independently. A failure
/// in one downgrades only that card.
pub async fn admin_counts(reader: &CollectionReader) -> AdminCounts {
    let (ideas, messages, licenses) = tokio::join!(
        count_collection(reader, collections::IDEAS),
        count_collection(reader, collections::MESSAGES),
        license_counts(reader),
    );

    AdminCounts {
        ideas,
        messages,
        licenses,
    }
}
