use crate::core::client::{http_client, read_body};
use crate::core::errors::{Error, Result};
use crate::core::utils::join_blob_name;
use log::{debug, info};
use reqwest::Url;
use std::fs;
use std::path::{is_separator, Component, Path, PathBuf};

/*-------------------------------------------------------------------------------------------------
  Blob Store
-------------------------------------------------------------------------------------------------*/

/// A flat key-value object store addressed by `/`-separated blob names.
pub trait BlobStore {
    fn upload(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    fn download(&self, name: &str) -> Result<Vec<u8>>;

    /// Full names of all blobs starting with `prefix`.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn upload(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        (**self).upload(name, data, content_type)
    }

    fn download(&self, name: &str) -> Result<Vec<u8>> {
        (**self).download(name)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).list(prefix)
    }
}

/*-------------------------------------------------------------------------------------------------
  Azure Blob Container
-------------------------------------------------------------------------------------------------*/

const AZURE_API_VERSION: &str = "2023-11-03";

/// An Azure Blob Storage container reached through a container SAS URL, e.g.
/// `https://{account}.blob.core.windows.net/$web?sv=...&sig=...`.
#[derive(Debug, Clone)]
pub struct AzureContainer {
    container_url: Url,
    sas: Option<String>,
}

impl AzureContainer {
    pub fn from_sas_url(sas_url: &str) -> Result<Self> {
        let mut container_url = Url::parse(sas_url)
            .map_err(|error| Error::Config(format!("invalid container URL: {error}")))?;
        if container_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "invalid container URL: {}",
                container_url.as_str()
            )));
        }

        let sas = container_url
            .query()
            .map(str::to_string)
            .filter(|query| !query.is_empty());
        container_url.set_query(None);
        container_url.set_fragment(None);

        Ok(Self { container_url, sas })
    }

    /// Container URL without the SAS query string.
    pub fn url(&self) -> &str {
        self.container_url.as_str()
    }

    fn blob_url(&self, name: &str) -> Result<Url> {
        let mut url = self.container_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("invalid container URL: {}", self.url())))?
            .pop_if_empty()
            .extend(name.split('/').filter(|segment| !segment.is_empty()));
        url.set_query(self.sas.as_deref());
        Ok(url)
    }

    fn list_url(&self) -> Url {
        let mut url = self.container_url.clone();
        url.set_query(self.sas.as_deref());
        url
    }
}

impl BlobStore for AzureContainer {
    fn upload(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        let url = self.blob_url(name)?;
        let display_url = format!("{}/{}", self.url().trim_end_matches('/'), name);
        debug!("PUT {} ({} bytes, {})", display_url, data.len(), content_type);

        let response = http_client(&display_url)?
            .put(url)
            .header("x-ms-version", AZURE_API_VERSION)
            .header("x-ms-blob-type", "BlockBlob")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send();
        read_body(&display_url, response).map(|_| ())
    }

    fn download(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.blob_url(name)?;
        let display_url = format!("{}/{}", self.url().trim_end_matches('/'), name);
        debug!("GET {}", display_url);

        let network_error = |source| Error::Network {
            url: display_url.clone(),
            source,
        };
        let response = http_client(&display_url)?
            .get(url)
            .header("x-ms-version", AZURE_API_VERSION)
            .send()
            .map_err(network_error)?;
        if !response.status().is_success() {
            return Err(Error::Status {
                url: display_url.clone(),
                status: response.status(),
            });
        }
        Ok(response.bytes().map_err(network_error)?.to_vec())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            debug!("List blobs in {} with prefix {:?}", self.url(), prefix);
            let mut query = vec![
                ("restype", "container".to_string()),
                ("comp", "list".to_string()),
                ("prefix", prefix.to_string()),
            ];
            if let Some(marker) = &marker {
                query.push(("marker", marker.clone()));
            }

            let response = http_client(self.url())?
                .get(self.list_url())
                .header("x-ms-version", AZURE_API_VERSION)
                .query(&query)
                .send();
            let body = read_body(self.url(), response)?;

            let (page, next_marker) = parse_blob_list(&body);
            names.extend(page);

            match next_marker {
                Some(next_marker) => marker = Some(next_marker),
                None => break,
            }
        }

        Ok(names)
    }
}

/// Extract the blob names and the continuation marker from a List Blobs response body.
fn parse_blob_list(xml: &str) -> (Vec<String>, Option<String>) {
    let names = xml
        .split("<Blob>")
        .skip(1)
        .filter_map(|blob| element_text(blob, "Name"))
        .collect();
    let next_marker = element_text(xml, "NextMarker").filter(|marker| !marker.is_empty());
    (names, next_marker)
}

fn element_text(xml: &str, element: &str) -> Option<String> {
    let open = format!("<{element}>");
    let close = format!("</{element}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(unescape_xml(&xml[start..end]))
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/*-------------------------------------------------------------------------------------------------
  Local Container
-------------------------------------------------------------------------------------------------*/

/// A blob container backed by a local directory; blob names map to relative paths.
#[derive(Debug, Clone)]
pub struct LocalContainer {
    root: PathBuf,
}

impl LocalContainer {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStore for LocalContainer {
    fn upload(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        let path = local_path(&self.root, name);
        debug!("Store {} ({}) at {:?}", name, content_type, path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| Error::io(parent, error))?;
        }
        fs::write(&path, data).map_err(|error| Error::io(&path, error))
    }

    fn download(&self, name: &str) -> Result<Vec<u8>> {
        let path = local_path(&self.root, name);
        fs::read(&path).map_err(|error| Error::io(&path, error))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        Ok(walk_files(&self.root)?
            .iter()
            .filter_map(|path| relative_blob_name(&self.root, path))
            .filter(|name| name.starts_with(prefix))
            .collect())
    }
}

/*-------------------------------------------------------------------------------------------------
  Publisher
-------------------------------------------------------------------------------------------------*/

/// Maps local files and directories to blob names and back.
#[derive(Debug, Clone)]
pub struct Publisher<S: BlobStore> {
    store: S,
}

impl<S: BlobStore> Publisher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /*-------------------------------------------------------------------------
      Upload
    -------------------------------------------------------------------------*/

    /// Upload a file or directory to `dest` inside the container.
    pub fn upload(&self, source: &Path, dest: &str) -> Result<Vec<String>> {
        if source.is_dir() {
            self.upload_dir(source, dest)
        } else {
            self.upload_file(source, dest).map(|name| vec![name])
        }
    }

    /// Upload a single file as blob `dest`. HTML files are tagged `text/html`.
    pub fn upload_file(&self, source: &Path, dest: &str) -> Result<String> {
        let name = join_blob_name([dest]);
        if name.is_empty() {
            return Err(Error::MissingDestination);
        }

        info!("Uploading {:?} to {}", source, name);
        let data = fs::read(source).map_err(|error| Error::io(source, error))?;
        self.store.upload(&name, data, content_type(source))?;
        Ok(name)
    }

    /// Upload every file under `source` as `{dest}/{source directory name}/{relative path}`.
    pub fn upload_dir(&self, source: &Path, dest: &str) -> Result<Vec<String>> {
        let dir_name = directory_name(source);

        let mut uploaded = Vec::new();
        for file in walk_files(source)? {
            let Some(relative) = relative_blob_name(source, &file) else {
                continue;
            };
            let name = join_blob_name([dest, dir_name.as_str(), relative.as_str()]);
            uploaded.push(self.upload_file(&file, &name)?);
        }
        info!("Uploaded {} file(s) from {:?}", uploaded.len(), source);
        Ok(uploaded)
    }

    /*-------------------------------------------------------------------------
      Download
    -------------------------------------------------------------------------*/

    /// Download a blob or a blob "directory" to `dest` on the local filesystem.
    ///
    /// When blobs exist under `source/`, each one is written beneath
    /// `dest/{last segment of source}/`. Otherwise `source` is downloaded as a single file.
    pub fn download(&self, source: &str, dest: &Path) -> Result<Vec<PathBuf>> {
        if dest.as_os_str().is_empty() {
            return Err(Error::MissingDestination);
        }

        let blobs = self.ls_files(source, true)?;
        if blobs.is_empty() {
            return self.download_file(source, dest).map(|path| vec![path]);
        }

        let dir_name = source
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .last()
            .unwrap_or_default();
        let dest_dir = local_path(dest, dir_name);

        blobs
            .iter()
            .map(|relative| {
                self.download_file(
                    &join_blob_name([source, relative.as_str()]),
                    &local_path(&dest_dir, relative),
                )
            })
            .collect()
    }

    /// Download a single blob. When `dest` names a directory (existing, trailing separator,
    /// or `.`), the blob's last name segment is used as the file name.
    pub fn download_file(&self, source: &str, dest: &Path) -> Result<PathBuf> {
        if dest.as_os_str().is_empty() {
            return Err(Error::MissingDestination);
        }

        let target = if names_directory(dest) {
            let file_name = source.rsplit('/').next().unwrap_or(source);
            dest.join(file_name)
        } else {
            dest.to_path_buf()
        };

        info!("Downloading {} to {:?}", source, target);
        if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| Error::io(parent, error))?;
        }
        let data = self.store.download(source)?;
        fs::write(&target, data).map_err(|error| Error::io(&target, error))?;
        Ok(target)
    }

    /*-------------------------------------------------------------------------
      List
    -------------------------------------------------------------------------*/

    /// Blob names under `path`, relative to it. Without `recursive`, names in nested
    /// "directories" are omitted.
    pub fn ls_files(&self, path: &str, recursive: bool) -> Result<Vec<String>> {
        let prefix = match join_blob_name([path]) {
            prefix if prefix.is_empty() => prefix,
            prefix => prefix + "/",
        };

        Ok(self
            .store
            .list(&prefix)?
            .into_iter()
            .filter_map(|name| name.strip_prefix(&prefix).map(str::to_string))
            .filter(|relative| !relative.is_empty())
            .filter(|relative| recursive || !relative.contains('/'))
            .collect())
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some(extension)
            if extension.eq_ignore_ascii_case("html") || extension.eq_ignore_ascii_case("htm") =>
        {
            "text/html"
        }
        _ => "text/plain",
    }
}

/// Recursively list the files under `directory`, sorted by path.
fn walk_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![directory.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(|error| Error::io(&current, error))?;
        for entry in entries {
            let entry = entry.map_err(|error| Error::io(&current, error))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|error| Error::io(&path, error))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// `/`-separated name of `path` relative to `base`.
fn relative_blob_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(join_blob_name(segments.iter().map(String::as_str)))
}

/// Local path for a `/`-separated blob name beneath `base`. `.` and `..` segments are dropped.
fn local_path(base: &Path, name: &str) -> PathBuf {
    name.split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// Last path component of a local directory, resolving `.` and `..` when possible.
fn directory_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            path.canonicalize()
                .ok()
                .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        })
        .unwrap_or_default()
}

fn names_directory(path: &Path) -> bool {
    let text = path.as_os_str().to_string_lossy();
    path.is_dir()
        || text.ends_with(is_separator)
        || matches!(
            path.components().next_back(),
            None | Some(Component::CurDir | Component::ParentDir | Component::RootDir)
        )
        || text
            .strip_suffix('.')
            .is_some_and(|rest| rest.ends_with(is_separator))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
