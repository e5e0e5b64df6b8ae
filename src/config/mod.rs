use std::path::{Path, PathBuf};

pub const HTML_FILE: &str = "extracted-email.html";
pub const TEXT_FILE: &str = "extracted-email.txt";

/// Where extracted bodies land. The file names are fixed; only the directory
/// can be moved.
#[derive(Debug, Clone)]
pub struct OutputTargets {
    pub dir: PathBuf,
}

impl OutputTargets {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn html_path(&self) -> PathBuf {
        self.path_for(HTML_FILE)
    }

    pub fn text_path(&self) -> PathBuf {
        self.path_for(TEXT_FILE)
    }

    // The working directory stays implicit so reports show the bare name.
    fn path_for(&self, file: &str) -> PathBuf {
        if self.dir.as_os_str().is_empty() || self.dir == Path::new(".") {
            PathBuf::from(file)
        } else {
            self.dir.join(file)
        }
    }
}
