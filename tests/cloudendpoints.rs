use assert_cmd::Command;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

/*-------------------------------------------------------------------------------------------------
  Helpers
-------------------------------------------------------------------------------------------------*/

fn cloudendpoints() -> Command {
    let mut command = Command::cargo_bin("cloudendpoints").unwrap();
    command
        .env_remove("CLOUDENDPOINTS_OFFICE365_URL")
        .env_remove("CLOUDENDPOINTS_AZURE_URL")
        .env_remove("CLOUDENDPOINTS_CONTAINER_URL");
    command
}

fn scratch_dir(name: &str) -> PathBuf {
    let directory: PathBuf = [".", "scratch", name].iter().collect();
    let _ = fs::remove_dir_all(&directory);
    fs::create_dir_all(&directory).unwrap();
    directory
}

/// Serve one canned JSON response and return the server's base URL.
fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        // Read until the end of the request head, then any body
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..read]);
        }
        let head = String::from_utf8_lossy(&request).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let head_len = request
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map_or(request.len(), |position| position + 4);
        while request.len() < head_len + content_length {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..read]);
        }

        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
        .unwrap();
    });

    base_url
}

/*-------------------------------------------------------------------------------------------------
  cloudendpoints Binary Tests
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Version and Help
--------------------------------------------------------------------------------------*/

#[test]
fn command_version() {
    cloudendpoints().arg("--version").assert().success();
}

#[test]
fn command_help() {
    cloudendpoints().arg("--help").assert().success();
}

#[test]
fn command_no_subcommand() {
    cloudendpoints().assert().failure();
}

/*--------------------------------------------------------------------------------------
  Export
--------------------------------------------------------------------------------------*/

/*-----------------------------------------------------------------------------
  Export: Both Sources, Summary, CSV, Local Container
-----------------------------------------------------------------------------*/

#[test]
fn command_export_and_publish() {
    let working = scratch_dir("command_export_and_publish");
    let office365_url = serve_once(
        r#"[
            {"serviceAreaDisplayName":"Exchange","ips":["1.2.3.0/24"],"urls":["a.com","b.com"]},
            {"serviceAreaDisplayName":"Exchange","ips":["5.6.7.0/24"]},
            {"serviceAreaDisplayName":"Skype","urls":["c.com"]}
        ]"#,
    );
    let azure_url = serve_once(r#"{"westeurope":["13.69.0.0/17"]}"#);

    cloudendpoints()
        .env("CLOUDENDPOINTS_OFFICE365_URL", &office365_url)
        .env("CLOUDENDPOINTS_AZURE_URL", &azure_url)
        .arg("export")
        .arg("--working-path")
        .arg(working.join("work"))
        .arg("--urls")
        .arg("urls.txt")
        .arg("--summary")
        .arg("--csv")
        .arg(working.join("office365.csv"))
        .arg("--container-dir")
        .arg(working.join("container"))
        .assert()
        .success();

    let artifacts = working.join("work").join("artifacts");
    assert_eq!(
        fs::read_to_string(artifacts.join("Exchange.txt")).unwrap(),
        "1.2.3.0/24\n5.6.7.0/24\n"
    );
    assert_eq!(
        fs::read_to_string(artifacts.join("urls.txt")).unwrap(),
        "a.com\nb.com\nc.com\n"
    );
    assert_eq!(
        fs::read_to_string(artifacts.join("Azure Cloud: region westeurope.txt")).unwrap(),
        "13.69.0.0/17\n"
    );
    assert!(!artifacts.join("Skype.txt").exists());

    let csv = fs::read_to_string(working.join("office365.csv")).unwrap();
    assert_eq!(
        csv,
        "Service Area,IP Range\nExchange,1.2.3.0/24\nExchange,5.6.7.0/24\n"
    );

    let container = working.join("container");
    assert!(container.join("main.html").is_file());
    assert!(container.join("artifacts").join("Exchange.txt").is_file());
}

/*-----------------------------------------------------------------------------
  Export: Network Failure Writes No Files
-----------------------------------------------------------------------------*/

#[test]
fn command_export_unreachable() {
    let working = scratch_dir("command_export_unreachable");

    cloudendpoints()
        .env("CLOUDENDPOINTS_OFFICE365_URL", "http://127.0.0.1:9/endpoints/worldwide")
        .env("CLOUDENDPOINTS_AZURE_URL", "http://127.0.0.1:9/getazuredcipranges")
        .arg("export")
        .arg("--working-path")
        .arg(&working)
        .assert()
        .failure()
        .code(1);

    let artifacts = working.join("artifacts");
    assert_eq!(fs::read_dir(artifacts).unwrap().count(), 0);
    assert!(!working.join("main.html").exists());
}

/*-----------------------------------------------------------------------------
  Export: Conflicting Source Flags
-----------------------------------------------------------------------------*/

#[test]
fn command_export_conflicting_sources() {
    cloudendpoints()
        .arg("export")
        .arg("--office365-only")
        .arg("--azure-only")
        .assert()
        .failure();
}

/*--------------------------------------------------------------------------------------
  Container Operations
--------------------------------------------------------------------------------------*/

/*-----------------------------------------------------------------------------
  List
-----------------------------------------------------------------------------*/

#[test]
fn command_ls() {
    let working = scratch_dir("command_ls");
    let container = working.join("container");
    fs::create_dir_all(container.join("artifacts").join("nested")).unwrap();
    fs::write(container.join("artifacts").join("Exchange.txt"), "1.2.3.0/24\n").unwrap();
    fs::write(container.join("artifacts").join("nested").join("urls.txt"), "a.com\n").unwrap();

    let output = cloudendpoints()
        .arg("ls")
        .arg("artifacts")
        .arg("--container-dir")
        .arg(&container)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Exchange.txt\n");

    let output = cloudendpoints()
        .arg("ls")
        .arg("artifacts")
        .arg("--recursive")
        .arg("--container-dir")
        .arg(&container)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Exchange.txt\nnested/urls.txt\n"
    );
}

/*-----------------------------------------------------------------------------
  Download
-----------------------------------------------------------------------------*/

#[test]
fn command_download() {
    let working = scratch_dir("command_download");
    let container = working.join("container");
    fs::create_dir_all(container.join("artifacts")).unwrap();
    fs::write(container.join("artifacts").join("Exchange.txt"), "1.2.3.0/24\n").unwrap();

    cloudendpoints()
        .arg("download")
        .arg("artifacts")
        .arg(working.join("restore"))
        .arg("--container-dir")
        .arg(&container)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(working.join("restore").join("artifacts").join("Exchange.txt")).unwrap(),
        "1.2.3.0/24\n"
    );
}

#[test]
fn command_download_requires_container() {
    let working = scratch_dir("command_download_requires_container");

    cloudendpoints()
        .arg("download")
        .arg("artifacts")
        .arg(working.join("restore"))
        .assert()
        .failure()
        .code(1);

    assert!(!working.join("restore").exists());
}
