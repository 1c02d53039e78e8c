use anyhow::{Context, Result};
use async_zip::base::write::ZipFileWriter;
use async_zip::{Compression, DeflateOption, ZipDateTime, ZipEntryBuilder};
use chrono::{DateTime, Datelike, Utc};
use log::debug;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Builder;

use crate::fs_utils::{ArchiveEntry, EntryKind};

/// 1980-01-01T00:00:00Z, the earliest time a zip entry can carry.
const DOS_EPOCH_SECS: i64 = 315_532_800;

/// Writes `entries` into a fresh ZIP file at `output` and returns its size.
///
/// Synchronous entrypoint: builds a current-thread tokio runtime and blocks
/// until the archive is finished.
pub fn write_zip_sync(output: &Path, entries: Vec<ArchiveEntry>) -> Result<u64> {
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting archive runtime")?;

    rt.block_on(write_zip_async(output, entries))
}

/// Async body of [`write_zip_sync`]. Any file already at `output` is removed first.
pub async fn write_zip_async(output: &Path, entries: Vec<ArchiveEntry>) -> Result<u64> {
    match fs::remove_file(output).await {
        Ok(()) => debug!("removed previous {}", output.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e).with_context(|| format!("removing existing {output:?}")),
    }

    let file = File::create(output)
        .await
        .with_context(|| format!("creating {output:?}"))?;
    let mut writer = ZipFileWriter::with_tokio(file);

    for entry in entries {
        let modified = fs::metadata(&entry.path)
            .await
            .ok()
            .and_then(|m| m.modified().ok());
        let builder = entry_builder(&entry, modified);

        match entry.kind {
            EntryKind::Dir => writer.write_entry_whole(builder, &[]).await,
            EntryKind::File => {
                let data = fs::read(&entry.path)
                    .await
                    .with_context(|| format!("reading {:?}", entry.path))?;
                writer.write_entry_whole(builder, &data).await
            }
        }
        .with_context(|| format!("adding {} to archive", entry.name_in_archive))?;

        debug!("added {}", entry.name_in_archive);
    }

    let mut file = writer
        .close()
        .await
        .context("finishing archive")?
        .into_inner();
    file.flush().await?;
    file.sync_all().await?;

    Ok(file.metadata().await?.len())
}

fn entry_builder(entry: &ArchiveEntry, modified: Option<SystemTime>) -> ZipEntryBuilder {
    let name = entry.name_in_archive.clone();
    let builder = match entry.kind {
        EntryKind::Dir => ZipEntryBuilder::new(name.into(), Compression::Stored),
        EntryKind::File => ZipEntryBuilder::new(name.into(), Compression::Deflate)
            .deflate_option(DeflateOption::Normal),
    };

    // DOS timestamps start at 1980; older or unknown times are pinned there
    let time = modified
        .map(DateTime::<Utc>::from)
        .filter(|time| time.year() >= 1980)
        .or_else(|| DateTime::from_timestamp(DOS_EPOCH_SECS, 0));
    match time {
        Some(time) => builder.last_modification_date(ZipDateTime::from_chrono(&time)),
        None => builder,
    }
}
