use super::*;

use tempfile::tempdir;

#[tokio::test]
async fn test_concatenates_in_order_with_separating_newlines() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.js");
    let b = dir.path().join("b.js");
    std::fs::write(&a, "var a = 1;").unwrap();
    std::fs::write(&b, "var b = 2;\n").unwrap();

    let out = dir.path().join("out/module.js");
    let written = concat_files(&[&a, &b], &out).await.unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content, "var a = 1;\nvar b = 2;\n\n");
    assert_eq!(written as usize, content.len());
}

#[tokio::test]
async fn test_empty_input_list_creates_empty_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("empty.js");
    let written = concat_files::<&Path>(&[], &out).await.unwrap();
    assert_eq!(written, 0);
    assert_eq!(std::fs::read(&out).unwrap(), b"");
}

#[tokio::test]
async fn test_missing_input_is_an_error_naming_the_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.js");
    let missing = dir.path().join("ghost.js");
    let err = concat_files(&[&missing], &out).await.unwrap_err();
    assert!(format!("{err:#}").contains("ghost.js"));
}

#[tokio::test]
async fn test_overwrites_previous_output() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.js");
    std::fs::write(&a, "fresh").unwrap();
    let out = dir.path().join("out.js");
    std::fs::write(&out, "stale stale stale stale").unwrap();

    concat_files(&[&a], &out).await.unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "fresh\n");
}
