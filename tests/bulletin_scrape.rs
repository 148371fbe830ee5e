use std::fs;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const CATALOG_PAGE: &str = r#"<!doctype html>
<html>
  <body>
    <div id="coursedescriptionstext">
      <div class="courseblock">
        <p class="courseblocktitle"><strong>COMP 3710 Advanced Topics in Artificial Intelligence (4 Credits)</strong></p>
        <p class="courseblockdesc">Search, planning, and learning.</p>
      </div>
      <div class="courseblock">
        <p class="courseblocktitle"><strong>COMP 1020 Introduction to Programming (4 Credits)</strong></p>
      </div>
      <div class="courseblock">
        <p class="courseblocktitle"><strong>COMP 3000 Boundary Seminar (2 Credits)</strong></p>
      </div>
      <div class="courseblock">
        <p class="courseblocktitle"><strong>MATH 3400 Real Analysis (4 Credits)</strong></p>
      </div>
    </div>
  </body>
</html>
"#;

fn spawn_catalog_server() -> (String, mpsc::Sender<()>, thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let addr = server.server_addr();
    let base_url = format!("http://{addr}");
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };
            let header = tiny_http::Header::from_bytes(
                &b"Content-Type"[..],
                &b"text/html; charset=utf-8"[..],
            )
            .expect("build header");
            let _ = request
                .respond(tiny_http::Response::from_string(CATALOG_PAGE).with_header(header));
        }
    });

    (base_url, shutdown_tx, handle)
}

#[test]
fn bulletin_scrape_keeps_upper_division_comp_courses() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_catalog_server();
    let temp = tempfile::TempDir::new()?;
    let out_dir = temp.path().join("results");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("duscrape");
    cmd.env("RUST_LOG", "info")
        .args([
            "bulletin",
            "--url",
            &format!("{base_url}/bulletin"),
            "--out",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let json = fs::read_to_string(out_dir.join("bulletin.json"))?;
    let expected_first = "    {\n      \"course\": \"COMP-3710\",\n      \"title\": \"COMP 3710 Advanced Topics in Artificial Intelligence (4 Credits)\"\n    }";
    assert!(
        json.contains(expected_first),
        "expected first course block in:\n{json}"
    );

    let value: serde_json::Value = serde_json::from_str(&json)?;
    let courses = value["courses"].as_array().expect("courses array");
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[1]["course"], "COMP-3000");
    assert!(!json.contains("COMP-1020"));
    assert!(!json.contains("MATH"));

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn bulletin_scrape_cutoff_flag_admits_lower_division_courses() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_catalog_server();
    let temp = tempfile::TempDir::new()?;
    let out_dir = temp.path().join("results");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("duscrape");
    cmd.env("RUST_LOG", "info")
        .args([
            "bulletin",
            "--url",
            &format!("{base_url}/bulletin"),
            "--out",
            out_dir.to_str().unwrap(),
            "--min-course",
            "1000",
        ])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("bulletin.json"))?)?;
    let courses = value["courses"].as_array().expect("courses array");
    assert_eq!(courses.len(), 3);
    assert_eq!(courses[1]["course"], "COMP-1020");

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}
