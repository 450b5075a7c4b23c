
use super::*;

fn revision(id: &str, message: &str) -> Revision {
    Revision {
        id: id.to_string(),
        message: message.to_string(),
        author: None,
        changes: vec![],
    }
}

#[test]
fn test_derived_message_appends_footer() {
    let rev = revision("0123abcd", "Commit A file.cpp");
    assert_eq!(
        rev.derived_message(),
        "Commit A file.cpp\n\nUltraBlame original commit: 0123abcd"
    );
}

#[test]
fn test_derived_message_keeps_original_verbatim() {
    let rev = revision("ff", "Commit M file.cpp A file.jsm\n\nBody line\n");
    assert_eq!(
        rev.derived_message(),
        "Commit M file.cpp A file.jsm\n\nBody line\n\n\nUltraBlame original commit: ff"
    );
}

#[test]
fn test_derived_message_empty_original() {
    let rev = revision("ab", "");
    assert_eq!(rev.derived_message(), "\n\nUltraBlame original commit: ab");
}

#[test]
fn test_selector_parse_index() {
    assert_eq!(
        "0".parse::<RevisionSelector>().unwrap(),
        RevisionSelector::Index(0)
    );
    assert_eq!(
        "42".parse::<RevisionSelector>().unwrap(),
        RevisionSelector::Index(42)
    );
}

#[test]
fn test_selector_parse_latest() {
    assert_eq!(
        "latest".parse::<RevisionSelector>().unwrap(),
        RevisionSelector::Latest
    );
    assert_eq!(
        "LATEST".parse::<RevisionSelector>().unwrap(),
        RevisionSelector::Latest
    );
    assert_eq!(
        "tip".parse::<RevisionSelector>().unwrap(),
        RevisionSelector::Latest
    );
}

#[test]
fn test_selector_parse_id() {
    assert_eq!(
        "a1b2c3".parse::<RevisionSelector>().unwrap(),
        RevisionSelector::Id("a1b2c3".to_string())
    );
    assert_eq!(
        "main".parse::<RevisionSelector>().unwrap(),
        RevisionSelector::Id("main".to_string())
    );
    assert_eq!(
        "HEAD~2".parse::<RevisionSelector>().unwrap(),
        RevisionSelector::Id("HEAD~2".to_string())
    );
}

#[test]
fn test_selector_display() {
    assert_eq!(RevisionSelector::Index(3).to_string(), "#3");
    assert_eq!(RevisionSelector::Latest.to_string(), "latest");
    assert_eq!(RevisionSelector::Id("abc".to_string()).to_string(), "abc");
}

#[test]
fn test_transform_config_identity() {
    assert!(TransformConfig::default().is_identity());
    assert!(!TransformConfig::new(true, false).is_identity());
    assert!(!TransformConfig::new(false, true).is_identity());
}

#[test]
fn test_transform_config_toml_defaults() {
    let config: TransformConfig = toml::from_str("tokenize = true").unwrap();
    assert!(config.tokenize);
    assert!(!config.remove_comments);
}
