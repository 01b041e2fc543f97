use std::collections::HashMap;
use std::env::temp_dir;
use std::fs;

use seed_gen::error::Result;
use seed_gen::error::SeedGenError;
use seed_gen::output;
use seed_gen::profiles::ProfileBatch;
use seed_gen::profiles::UserProfile;
use seed_gen::shard;
use uuid::Uuid;

fn profile(i: u64) -> UserProfile {
    UserProfile {
        id: format!("A{i:08}"),
        first_name: "Sherry".to_string(),
        last_name: "Ritter".to_string(),
        birthdate: "1964-02-14".to_string(),
        gender: (i % 2) as u8,
        username: format!("user{i}"),
        email: format!("user{i}@example.org"),
        phone: format!("6{i:012}"),
    }
}

fn batch(n: u64) -> ProfileBatch {
    ProfileBatch {
        entries: (0..n).map(|i| (i, profile(i))).collect(),
    }
}

#[test]
fn test_split_1500_into_two_shards() -> Result<()> {
    let batch = batch(1500);

    let mut batch_path = temp_dir();
    batch_path.push(format!("{}.json", Uuid::new_v4()));
    output::write_json_atomic(&batch_path, &batch)?;

    let loaded = ProfileBatch::from_json_reader(output::open_input(&batch_path)?)?;
    assert_eq!(loaded, batch);

    let mut out_dir = temp_dir();
    out_dir.push(Uuid::new_v4().to_string());
    let count = shard::write_shards(&loaded, &out_dir, "users")?;
    assert_eq!(count, 2);
    assert!(!shard::shard_path(&out_dir, "users", 2).exists());

    let first: HashMap<String, UserProfile> =
        serde_json::from_str(&fs::read_to_string(shard::shard_path(&out_dir, "users", 0))?)?;
    let second: HashMap<String, UserProfile> =
        serde_json::from_str(&fs::read_to_string(shard::shard_path(&out_dir, "users", 1))?)?;
    assert_eq!(first.len(), 1000);
    assert_eq!(second.len(), 500);
    assert!(first.contains_key("0"));
    assert!(first.contains_key("999"));
    assert!(second.contains_key("1000"));
    assert!(second.contains_key("1499"));

    // concatenating the shards reproduces the batch exactly
    let mut merged = first;
    merged.extend(second);
    assert_eq!(merged.len(), batch.len());
    for (idx, profile) in &batch.entries {
        assert_eq!(merged[&idx.to_string()], *profile);
    }
    Ok(())
}

#[test]
fn test_empty_batch_writes_no_shards() -> Result<()> {
    let mut out_dir = temp_dir();
    out_dir.push(Uuid::new_v4().to_string());
    let count = shard::write_shards(&batch(0), &out_dir, "users")?;
    assert_eq!(count, 0);
    assert!(!shard::shard_path(&out_dir, "users", 0).exists());
    Ok(())
}

#[test]
fn test_batch_load_sorts_numerically() -> Result<()> {
    let json = format!(
        r#"{{"10":{p},"2":{p},"0":{p}}}"#,
        p = serde_json::to_string(&profile(0))?
    );
    let batch = ProfileBatch::from_json_reader(json.as_bytes())?;
    let indices: Vec<u64> = batch.entries.iter().map(|(idx, _)| *idx).collect();
    assert_eq!(indices, vec![0, 2, 10]);
    Ok(())
}

#[test]
fn test_batch_rejects_non_integer_keys() {
    let json = format!(
        r#"{{"first":{p}}}"#,
        p = serde_json::to_string(&profile(0)).unwrap()
    );
    let res = ProfileBatch::from_json_reader(json.as_bytes());
    assert!(matches!(res, Err(SeedGenError::General(_))));
}

#[test]
fn test_missing_input_file() {
    let mut path = temp_dir();
    path.push(format!("{}.json", Uuid::new_v4()));
    let res = output::open_input(&path);
    assert!(matches!(res, Err(SeedGenError::FileNotFound(_))));
}

#[test]
fn test_atomic_write_leaves_no_tmp_file() -> Result<()> {
    let mut path = temp_dir();
    path.push(format!("{}.json", Uuid::new_v4()));
    output::write_json_atomic(&path, &batch(3))?;
    assert!(path.exists());
    let mut tmp = path.clone().into_os_string();
    tmp.push(".tmp");
    assert!(!std::path::PathBuf::from(tmp).exists());
    Ok(())
}
