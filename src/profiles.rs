use std::collections::HashMap;
use std::collections::HashSet;
use std::io;

use chrono::Duration;
use chrono::NaiveDate;
use chrono::Utc;
use fake::faker::internet::en::SafeEmail;
use fake::faker::internet::en::Username;
use fake::faker::name::en::Name;
use fake::Fake;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use rand::Rng;
use serde::ser::SerializeMap;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use tracing::info;

use crate::error::Result;
use crate::error::SeedGenError;

pub const MIN_AGE_DAYS: i64 = 18 * 365;
pub const MAX_AGE_DAYS: i64 = 60 * 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: String,
    pub gender: u8,
    pub username: String,
    pub email: String,
    pub phone: String,
}

/// A generated batch: profiles keyed by their 0-based generation index.
/// Serializes to a single JSON object keyed by stringified integers, emitted
/// in ascending index order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileBatch {
    pub entries: Vec<(u64, UserProfile)>,
}

impl ProfileBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a batch from its JSON form. Keys are re-sorted numerically, so
    /// the key order inside the file does not matter.
    pub fn from_json_reader<R: io::Read>(rdr: R) -> Result<Self> {
        let raw: HashMap<String, UserProfile> = serde_json::from_reader(rdr)?;
        let mut entries = raw
            .into_iter()
            .map(|(key, profile)| {
                let idx = key.parse::<u64>().map_err(|_| {
                    SeedGenError::General(format!("batch key {key:?} is not an integer index"))
                })?;
                Ok((idx, profile))
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_unstable_by_key(|(idx, _)| *idx);
        Ok(Self { entries })
    }
}

impl Serialize for ProfileBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (idx, profile) in &self.entries {
            map.serialize_entry(&idx.to_string(), profile)?;
        }
        map.end()
    }
}

/// Draws candidates until `n` distinct values are collected. Duplicates are
/// discarded and re-drawn, capped so a too-small candidate space fails
/// instead of spinning. The returned vec is in draw order, so the result is
/// a pure function of the rng.
pub fn unique_pool<R, F>(n: usize, kind: &'static str, rng: &mut R, mut draw: F) -> Result<Vec<String>>
where
    R: Rng,
    F: FnMut(&mut R) -> String,
{
    let max_attempts = n.saturating_mul(64).saturating_add(1024);
    let mut seen: HashSet<String> = HashSet::with_capacity(n);
    let mut pool: Vec<String> = Vec::with_capacity(n);
    let mut attempts = 0usize;
    while pool.len() < n {
        if attempts >= max_attempts {
            return Err(SeedGenError::UniquePoolExhausted {
                kind,
                attempts,
                have: pool.len(),
                want: n,
            });
        }
        attempts += 1;
        let candidate = draw(rng);
        if seen.insert(candidate.clone()) {
            pool.push(candidate);
        }
    }
    Ok(pool)
}

/// Generates one fake profile per identifier. Usernames and emails are
/// pre-generated as whole unique pools and consumed one per profile, which is
/// what guarantees batch-wide distinctness. The identifier lands verbatim in
/// the profile's `id`; the batch index is the iteration position.
pub fn generate_batch<R: Rng>(ids: &[String], rng: &mut R) -> Result<ProfileBatch> {
    info!("pre-generating {} unique usernames", ids.len());
    let mut usernames = unique_pool(ids.len(), "username", rng, |rng| Username().fake_with_rng(rng))?;
    info!("pre-generating {} unique emails", ids.len());
    let mut emails = unique_pool(ids.len(), "email", rng, |rng| SafeEmail().fake_with_rng(rng))?;

    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} profiles",
        )
        .unwrap()
        .progress_chars("#>-"),
    );

    let today = Utc::now().date_naive();
    let mut entries = Vec::with_capacity(ids.len());
    for (idx, id) in ids.iter().enumerate() {
        let full_name: String = Name().fake_with_rng(rng);
        let (first_name, last_name) = split_full_name(&full_name);
        let sex = if rng.gen_bool(0.5) { 'M' } else { 'F' };
        let profile = UserProfile {
            id: id.clone(),
            first_name,
            last_name,
            birthdate: fake_birthdate(today, rng).to_string(),
            gender: if sex == 'M' { 0 } else { 1 },
            username: usernames
                .pop()
                .ok_or_else(|| SeedGenError::Internal("username pool drained early".to_string()))?,
            email: emails
                .pop()
                .ok_or_else(|| SeedGenError::Internal("email pool drained early".to_string()))?,
            phone: fake_phone(rng),
        };
        entries.push((idx as u64, profile));
        pb.inc(1);
    }
    pb.finish();
    info!("generated {} profiles", entries.len());
    Ok(ProfileBatch { entries })
}

/// Splits on the last whitespace boundary; a name without whitespace keeps
/// everything in the first name and leaves the last name empty.
fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.rsplit_once(' ') {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (full_name.to_string(), String::new()),
    }
}

/// Uniform date between 60 and 18 years before `today`.
fn fake_birthdate<R: Rng>(today: NaiveDate, rng: &mut R) -> NaiveDate {
    today - Duration::days(rng.gen_range(MIN_AGE_DAYS..=MAX_AGE_DAYS))
}

/// One non-zero digit followed by 12 arbitrary digits.
fn fake_phone<R: Rng>(rng: &mut R) -> String {
    format!(
        "{}{:012}",
        rng.gen_range(1..=9),
        rng.gen_range(0..1_000_000_000_000u64)
    )
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("Sherry Ritter"),
            ("Sherry".to_string(), "Ritter".to_string())
        );
        assert_eq!(
            split_full_name("Mary Jane Watson"),
            ("Mary Jane".to_string(), "Watson".to_string())
        );
        assert_eq!(split_full_name("Cher"), ("Cher".to_string(), String::new()));
    }

    #[test]
    fn test_fake_phone_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let phone = fake_phone(&mut rng);
            assert_eq!(phone.len(), 13);
            assert_ne!(phone.as_bytes()[0], b'0');
            assert!(phone.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_fake_birthdate_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        for _ in 0..100 {
            let birthdate = fake_birthdate(today, &mut rng);
            assert!(birthdate >= today - Duration::days(MAX_AGE_DAYS));
            assert!(birthdate <= today - Duration::days(MIN_AGE_DAYS));
        }
    }
}
