use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;

const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mws:Products xmlns:mws="http://modapsws.gsfc.nasa.gov/xsd/mws">
  <mws:Product>
    <mws:Name>MYD09GA</mws:Name>
    <mws:Description>Surface Reflectance</mws:Description>
  </mws:Product>
  <mws:Product>
    <mws:Name>MOD11A1</mws:Name>
    <mws:Description>Land Surface Temp</mws:Description>
  </mws:Product>
</mws:Products>"#;

fn modaps(server: &Server, rc_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("modaps").unwrap();
    cmd.env("MODAPS_URL", server.url())
        .env("MODAPS_RC", rc_dir.path().join("absent.modapsrc"));
    cmd
}

#[test]
fn test_list_mode_filters_by_term() {
    let mut server = Server::new();
    server
        .mock("GET", "/listProducts")
        .with_status(200)
        .with_body(CATALOG)
        .create();
    let rc_dir = tempfile::tempdir().unwrap();

    modaps(&server, &rc_dir)
        .args(["-m", "list", "-t", "myd"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "MYD09GA . . . . . Surface Reflectance",
        ))
        .stdout(predicate::str::contains("MOD11A1").not())
        .stdout(predicate::str::ends_with("Done.\n"));
}

#[test]
fn test_list_mode_without_term_prints_everything() {
    let mut server = Server::new();
    server
        .mock("GET", "/listProducts")
        .with_status(200)
        .with_body(CATALOG)
        .create();
    let rc_dir = tempfile::tempdir().unwrap();

    modaps(&server, &rc_dir)
        .args(["--mode", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MYD09GA").and(predicate::str::contains("MOD11A1")));
}

#[test]
fn test_search_mode_prints_ids_in_order() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/searchForFiles")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("products".into(), "MOD09GA".into()),
            Matcher::UrlEncoded("coordsOrTiles".into(), "tiles".into()),
            Matcher::UrlEncoded("north".into(), "17".into()),
            Matcher::UrlEncoded("south".into(), "0".into()),
            Matcher::UrlEncoded("east".into(), "35".into()),
            Matcher::UrlEncoded("west".into(), "0".into()),
            Matcher::UrlEncoded("startTime".into(), "2020-01-01".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"<mws:searchForFilesResponse xmlns:mws="urn:x"><return>222</return><return>111</return></mws:searchForFilesResponse>"#,
        )
        .create();
    let rc_dir = tempfile::tempdir().unwrap();

    modaps(&server, &rc_dir)
        .args(["-p", "mod09ga", "-c", "tiles", "--start", "2020-01-01"])
        .assert()
        .success()
        .stdout("222\n111\nDone.\n");
    mock.assert();
}

#[test]
fn test_download_mode_writes_output() {
    let mut server = Server::new();
    let base = server.url();
    let payload: [u8; 6] = [0x0e, 0x03, 0x13, 0x01, 0x00, 0xff];
    server
        .mock("GET", "/getFileUrls")
        .match_query(Matcher::UrlEncoded("fileIds".into(), "1412536410".into()))
        .with_status(200)
        .with_body(format!(
            r#"<mws:getFileUrlsResponse xmlns:mws="urn:x"><return>{}/data/g.hdf</return></mws:getFileUrlsResponse>"#,
            base
        ))
        .create();
    server
        .mock("GET", "/data/g.hdf")
        .with_status(200)
        .with_body(payload)
        .create();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.hdf");

    modaps(&server, &dir)
        .args(["-m", "download", "-q", "--pid", "1412536410", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Done."));
    assert_eq!(std::fs::read(&output).unwrap(), payload);
}

#[test]
fn test_download_mode_requires_pid() {
    let server = Server::new();
    let rc_dir = tempfile::tempdir().unwrap();

    modaps(&server, &rc_dir)
        .args(["--mode", "download"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pid"));
}

#[test]
fn test_invalid_coords_mode() {
    let server = Server::new();
    let rc_dir = tempfile::tempdir().unwrap();

    modaps(&server, &rc_dir)
        .args(["--coords", "sinusoidal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_server_error_fails_without_done() {
    let mut server = Server::new();
    server
        .mock("GET", "/listProducts")
        .with_status(503)
        .with_body("maintenance")
        .create();
    let rc_dir = tempfile::tempdir().unwrap();

    modaps(&server, &rc_dir)
        .args(["-m", "list"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Done.").not())
        .stderr(predicate::str::contains("HTTP 503"));
}

fn write_rc(dir: &tempfile::TempDir, url: &str) -> std::path::PathBuf {
    let path = dir.path().join(".modapsrc");
    std::fs::write(&path, format!("# test mirror\nurl: {}\n", url)).unwrap();
    path
}

#[test]
fn test_env_url_wins_over_rc_file() {
    let mut server = Server::new();
    server
        .mock("GET", "/listProducts")
        .with_status(200)
        .with_body(CATALOG)
        .create();
    let rc_dir = tempfile::tempdir().unwrap();
    let rc = write_rc(&rc_dir, "http://rc.invalid/MODAPSservices");

    Command::cargo_bin("modaps")
        .unwrap()
        .env("MODAPS_URL", server.url())
        .env("MODAPS_RC", &rc)
        .env("RUST_LOG", "info")
        .args(["-m", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MYD09GA"))
        .stderr(predicate::str::contains(format!(
            "Using MODAPS service at {}",
            server.url()
        )));
}

#[test]
fn test_rc_file_wins_over_default() {
    let mut server = Server::new();
    server
        .mock("GET", "/listProducts")
        .with_status(200)
        .with_body(CATALOG)
        .create();
    let rc_dir = tempfile::tempdir().unwrap();
    let rc = write_rc(&rc_dir, &server.url());

    Command::cargo_bin("modaps")
        .unwrap()
        .env_remove("MODAPS_URL")
        .env("MODAPS_RC", &rc)
        .args(["-m", "list", "-t", "mod11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MOD11A1 . . . . . Land Surface Temp"));
}

#[test]
fn test_no_configuration_uses_public_endpoint() {
    let rc_dir = tempfile::tempdir().unwrap();

    // Download without --pid stops before any request is made.
    Command::cargo_bin("modaps")
        .unwrap()
        .env_remove("MODAPS_URL")
        .env("MODAPS_RC", rc_dir.path().join("absent.modapsrc"))
        .env("RUST_LOG", "info")
        .args(["-m", "download"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!(
            "Using MODAPS service at {}",
            modaps::DEFAULT_URL
        )));
}

#[test]
fn test_download_mode_several_ids_into_directory() {
    let mut server = Server::new();
    let base = server.url();
    server
        .mock("GET", "/getFileUrls")
        .match_query(Matcher::UrlEncoded("fileIds".into(), "1,2".into()))
        .with_status(200)
        .with_body(format!(
            r#"<mws:getFileUrlsResponse xmlns:mws="urn:x"><return>{}/data/bundle.hdf</return></mws:getFileUrlsResponse>"#,
            base
        ))
        .create();
    server
        .mock("GET", "/data/bundle.hdf")
        .with_status(200)
        .with_body("bundle")
        .create();
    let dir = tempfile::tempdir().unwrap();

    modaps(&server, &dir)
        .args(["-m", "download", "-q", "--pid", "1,2", "-o"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("bundle.hdf"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("bundle.hdf")).unwrap(),
        "bundle"
    );
}
