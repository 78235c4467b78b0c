// Common test utilities and fixtures

use ferret::core::config::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A throwaway corpus directory populated with the given files.
pub struct TestCorpus {
    dir: TempDir,
}

impl TestCorpus {
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
        }
        Self { dir }
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).unwrap();
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.dir.path().join(name)).unwrap();
    }
}

/// Config crawling only the given corpus, with a small worker pool.
pub fn config_for(corpus: &TestCorpus) -> Config {
    let mut config = Config::default();
    config.indexing.topdirs = vec![corpus.path().to_path_buf()];
    config.indexing.worker_count = 2;
    config.indexing.queue_depth = 8;
    config
}
