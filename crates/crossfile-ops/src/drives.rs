//! Enumeration of available filesystem roots.

use serde::Serialize;

/// One mount point or drive.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriveEntry {
    pub path: String,
    pub name: String,
}

impl DriveEntry {
    fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Enumerate filesystem roots: drive letters on Windows, mount points
/// elsewhere. Never fails; at worst returns the root alone.
pub fn list_drives() -> Vec<DriveEntry> {
    platform_drives()
}

#[cfg(target_os = "windows")]
fn platform_drives() -> Vec<DriveEntry> {
    ('A'..='Z')
        .filter_map(|letter| {
            let path = format!("{letter}:\\");
            std::path::Path::new(&path)
                .exists()
                .then(|| DriveEntry::new(path.clone(), format!("{letter}:")))
        })
        .collect()
}

#[cfg(target_os = "macos")]
fn platform_drives() -> Vec<DriveEntry> {
    let mut drives = vec![DriveEntry::new("/", "Macintosh HD")];
    if let Ok(entries) = std::fs::read_dir("/Volumes") {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            drives.push(DriveEntry::new(entry.path().to_string_lossy(), name));
        }
    }
    drives
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_drives() -> Vec<DriveEntry> {
    let mut drives = vec![DriveEntry::new("/", "/")];

    // Real block-device mounts from /proc/mounts; pseudo-filesystems
    // have non-path device names and are skipped.
    if let Ok(mounts) = std::fs::read_to_string("/proc/mounts") {
        for line in mounts.lines() {
            let mut parts = line.split_whitespace();
            let (Some(device), Some(mount_point)) = (parts.next(), parts.next()) else {
                continue;
            };
            if !device.starts_with('/') || mount_point == "/" {
                continue;
            }
            let name = mount_point.rsplit('/').next().unwrap_or(mount_point);
            drives.push(DriveEntry::new(unescape_mount(mount_point), name));
        }
    }

    drives
}

/// /proc/mounts octal-escapes spaces and some punctuation.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn unescape_mount(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let digits: String = chars.by_ref().take(3).collect();
            if let Ok(code) = u8::from_str_radix(&digits, 8) {
                out.push(code as char);
                continue;
            }
            out.push(c);
            out.push_str(&digits);
        } else {
            out.push(c);
        }
    }
    out
}
