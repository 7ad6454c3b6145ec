//! Line-oriented text format with call-site paths relative to the working directory.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Formats each event as
/// `<timestamp> <LEVEL> <file>:<line>: <message> <key>=<value>...`.
pub struct SourceRelativeFormat {
    base_dir: PathBuf,
    source_root: PathBuf,
    timer: SystemTime,
}

impl SourceRelativeFormat {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            source_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            timer: SystemTime,
        }
    }

    /// Directory that relative `file!()` paths are anchored to.
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    fn source_path(&self, file: &str) -> String {
        let path = Path::new(file);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.source_root.join(path)
        };
        match relative_to(&self.base_dir, &absolute) {
            Some(rel) => rel.display().to_string(),
            None => file.to_string(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for SourceRelativeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if self.timer.format_time(&mut writer).is_err() {
            writer.write_str("<unknown time>")?;
        }
        write!(writer, " {:>5} ", meta.level())?;

        if let Some(file) = meta.file() {
            writer.write_str(&self.source_path(file))?;
            if let Some(line) = meta.line() {
                write!(writer, ":{line}")?;
            }
            writer.write_str(": ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Path of `path` relative to `base`, e.g. `/a/b` + `/a/b/c/d.rs` gives
/// `c/d.rs` and `/a/b` + `/a/x.rs` gives `../x.rs`.
///
/// Returns `None` when no relative path exists: one side absolute and the
/// other not, differing roots or drive prefixes, or `..` left over in `base`.
pub fn relative_to(base: &Path, path: &Path) -> Option<PathBuf> {
    if base.is_absolute() != path.is_absolute() {
        return None;
    }

    let mut base_parts = base.components().filter(|c| *c != Component::CurDir).peekable();
    let mut path_parts = path.components().filter(|c| *c != Component::CurDir).peekable();
    while let (Some(a), Some(b)) = (base_parts.peek(), path_parts.peek()) {
        if a != b {
            break;
        }
        base_parts.next();
        path_parts.next();
    }

    let mut rel = PathBuf::new();
    for part in base_parts {
        match part {
            Component::Normal(_) => rel.push(".."),
            _ => return None,
        }
    }
    for part in path_parts {
        match part {
            Component::Normal(_) | Component::ParentDir => rel.push(part),
            _ => return None,
        }
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_relative_inside_base() {
        let rel = relative_to(Path::new("/a/b"), Path::new("/a/b/c/d.go")).unwrap();
        assert_eq!(rel, PathBuf::from("c/d.go"));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_outside_base() {
        let rel = relative_to(Path::new("/a/b"), Path::new("/a/x/y.rs")).unwrap();
        assert_eq!(rel, PathBuf::from("../x/y.rs"));

        let rel = relative_to(Path::new("/a/b/"), Path::new("/src/main.rs")).unwrap();
        assert_eq!(rel, PathBuf::from("../../src/main.rs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_same_dir() {
        let rel = relative_to(Path::new("/a/./b"), Path::new("/a/b")).unwrap();
        assert_eq!(rel, PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_needs_matching_roots() {
        assert_eq!(relative_to(Path::new("/a/b"), Path::new("src/main.rs")), None);
        assert_eq!(relative_to(Path::new("src"), Path::new("/a/b/c.rs")), None);
        assert_eq!(relative_to(Path::new("/a/../b"), Path::new("/c.rs")), None);
    }

    #[cfg(windows)]
    #[test]
    fn test_relative_across_drives() {
        assert_eq!(relative_to(Path::new(r"C:\work"), Path::new(r"D:\src\main.rs")), None);
        let rel = relative_to(Path::new(r"C:\work"), Path::new(r"C:\work\src\main.rs")).unwrap();
        assert_eq!(rel, PathBuf::from(r"src\main.rs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_source_path_anchored_to_source_root() {
        let format = SourceRelativeFormat::new("/srv/app").with_source_root("/srv/app");
        assert_eq!(format.source_path("src/main.rs"), "src/main.rs");
        assert_eq!(format.source_path("/srv/app/src/lib.rs"), "src/lib.rs");

        let format = SourceRelativeFormat::new("/srv/app/src").with_source_root("/srv/app");
        assert_eq!(format.source_path("src/main.rs"), "main.rs");

        let format = SourceRelativeFormat::new("/srv/app").with_source_root("/elsewhere");
        assert_eq!(format.source_path("src/main.rs"), "../../elsewhere/src/main.rs");
    }
}
