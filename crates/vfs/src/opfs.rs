//! Browser-backed sandbox filesystem using OPFS (Origin Private File System)
//!
//! The storage is origin-scoped and lives under `navigator.storage`. Quota is
//! negotiated by the browser, so acquisition only checks that the origin's
//! storage estimate leaves room for the requested amount.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    window, FileSystemDirectoryHandle, FileSystemFileHandle, FileSystemHandle,
    FileSystemHandleKind, StorageManager,
};

use super::backend::{path_components, DirEntry, EntryKind, FileStat, SandboxFs};

fn js_error(err: JsValue) -> anyhow::Error {
    anyhow!("{}", err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn storage_manager() -> Result<StorageManager, JsValue> {
    let win = window().ok_or("No window")?;
    Ok(win.navigator().storage())
}

/// Ask the browser how many bytes this origin may store
async fn estimated_quota(storage: &StorageManager) -> Result<Option<f64>, JsValue> {
    let estimate_fn = js_sys::Reflect::get(storage, &"estimate".into())?;
    let Some(estimate_fn) = estimate_fn.dyn_ref::<js_sys::Function>() else {
        return Ok(None);
    };
    let promise: js_sys::Promise = estimate_fn.call0(storage)?.dyn_into()?;
    let estimate = JsFuture::from(promise).await?;
    Ok(js_sys::Reflect::get(&estimate, &"quota".into())?.as_f64())
}

/// OPFS-backed filesystem handle
pub struct OpfsFs {
    root: FileSystemDirectoryHandle,
    quota: u64,
}

impl OpfsFs {
    /// Acquire the origin's private filesystem with the given quota
    ///
    /// Fails when the storage API is missing or the origin's estimated quota is
    /// smaller than `quota`.
    pub async fn request(quota: u64) -> Result<Self, JsValue> {
        let storage = storage_manager()?;

        if let Some(available) = estimated_quota(&storage).await? {
            #[allow(clippy::cast_precision_loss)]
            let wanted = quota as f64;
            if available < wanted {
                return Err(JsValue::from_str(&format!(
                    "quota {quota} exceeds available storage {available}"
                )));
            }
        }

        let root_val = JsFuture::from(storage.get_directory()).await?;
        let root = root_val.dyn_into::<FileSystemDirectoryHandle>()?;
        tracing::debug!(quota, "acquired OPFS root");
        Ok(Self { root, quota })
    }

    /// Walk `path` from the root, one directory handle per component
    async fn directory(&self, path: &str) -> Result<FileSystemDirectoryHandle, JsValue> {
        let mut dir = self.root.clone();
        for part in path_components(path) {
            let next = JsFuture::from(dir.get_directory_handle(part)).await?;
            dir = next.dyn_into::<FileSystemDirectoryHandle>()?;
        }
        Ok(dir)
    }

    async fn stat_js(&self, path: &str) -> Result<FileStat, JsValue> {
        let parts: Vec<&str> = path_components(path).collect();
        let Some((name, parents)) = parts.split_last() else {
            return Ok(FileStat::dir());
        };

        let parent = self.directory(&parents.join("/")).await?;

        if JsFuture::from(parent.get_directory_handle(name)).await.is_ok() {
            return Ok(FileStat::dir());
        }

        let handle = JsFuture::from(parent.get_file_handle(name))
            .await?
            .dyn_into::<FileSystemFileHandle>()?;
        let file = JsFuture::from(handle.get_file())
            .await?
            .dyn_into::<web_sys::File>()?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = file.size() as u64;
        Ok(FileStat::file(size))
    }

    async fn read_dir_js(&self, path: &str) -> Result<Vec<DirEntry>, JsValue> {
        let dir = self.directory(path).await?;
        let entries: js_sys::Array = JsFuture::from(get_entries_array(&dir)).await?.dyn_into()?;

        let mut children = Vec::with_capacity(entries.length() as usize);
        for val in entries.to_vec() {
            let handle = val.dyn_into::<FileSystemHandle>()?;
            let kind = match handle.kind() {
                FileSystemHandleKind::Directory => EntryKind::Directory,
                FileSystemHandleKind::File => EntryKind::File,
                _ => EntryKind::Other,
            };
            children.push(DirEntry::new(handle.name(), kind));
        }
        Ok(children)
    }
}

#[async_trait(?Send)]
impl SandboxFs for OpfsFs {
    async fn stat(&self, path: &str) -> Result<FileStat> {
        self.stat_js(path).await.map_err(js_error)
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        self.read_dir_js(path).await.map_err(js_error)
    }

    fn quota(&self) -> u64 {
        self.quota
    }
}

#[wasm_bindgen(inline_js = "
    export async function get_entries_array(dirHandle) {
        const entries = [];
        for await (const entry of dirHandle.values()) {
            entries.push(entry);
        }
        return entries;
    }
")]
extern "C" {
    fn get_entries_array(dir: &FileSystemDirectoryHandle) -> js_sys::Promise;
}
