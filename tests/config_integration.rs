use std::path::PathBuf;

use cloudlift::config::{ExplicitCredentials, load_profiles, resolve_credentials};
use cloudlift::error::UploadError;

fn scratch_config(label: &str, body: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("cloudlift_it_cfg_{}_{}.yaml", label, std::process::id()));
    std::fs::write(&p, body).expect("write scratch config");
    p
}

const PROFILES: &str = "\
default:
  cloud_name: demo
  api_key: demo-key
  api_secret: demo-secret
prod:
  cloud_name: prodcloud
  api_key: prod-key
  api_secret: prod-secret
";

#[test]
fn prod_profile_wins_over_explicit_flags() {
    let cfg = scratch_config("prod", PROFILES);
    let explicit = ExplicitCredentials {
        cloud_name: Some("ignored".to_string()),
        api_key: Some("ignored".to_string()),
        api_secret: Some("ignored".to_string()),
    };
    let creds =
        resolve_credentials(Some(&cfg), Some("prod"), explicit).expect("prod profile resolves");
    assert_eq!(creds.cloud_name, "prodcloud");
    assert_eq!(creds.api_key, "prod-key");
    assert_eq!(creds.api_secret, "prod-secret");
    let _ = std::fs::remove_file(&cfg);
}

#[test]
fn omitted_profile_selects_default() {
    let cfg = scratch_config("implicit", PROFILES);
    let creds = resolve_credentials(Some(&cfg), None, ExplicitCredentials::default())
        .expect("default profile resolves");
    assert_eq!(creds.cloud_name, "demo");
    let _ = std::fs::remove_file(&cfg);
}

#[test]
fn missing_config_file_terminates_before_any_upload() {
    let missing = PathBuf::from("/nonexistent/cloudlift/it/cloudinary.yaml");
    let err = resolve_credentials(Some(&missing), None, ExplicitCredentials::default())
        .expect_err("missing config");
    assert!(matches!(err.downcast_ref::<UploadError>(), Some(UploadError::ConfigNotFound(_))));
}

#[test]
fn unknown_profile_is_a_key_lookup_error() {
    let cfg = scratch_config("unknown", PROFILES);
    let err = resolve_credentials(Some(&cfg), Some("staging"), ExplicitCredentials::default())
        .expect_err("staging absent");
    match err.downcast_ref::<UploadError>() {
        Some(UploadError::ProfileNotFound(name)) => assert_eq!(name, "staging"),
        other => panic!("unexpected error: {:?}", other),
    }
    let _ = std::fs::remove_file(&cfg);
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let cfg = scratch_config("malformed", "default: [not, a, profile, mapping]\n");
    let err = load_profiles(&cfg).expect_err("shape mismatch");
    assert!(matches!(err.downcast_ref::<UploadError>(), Some(UploadError::ConfigParse(_, _))));
    let _ = std::fs::remove_file(&cfg);
}
