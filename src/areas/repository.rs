use crate::areas::commits::CommitStore;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::remote::Remotes;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::Config;
use crate::errors::RepositoryError;
use std::cell::{RefCell, RefMut};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    config: Config,
    index: Arc<Mutex<Index>>,
    database: Database,
    commits: CommitStore,
    workspace: Workspace,
    refs: Refs,
    remotes: Remotes,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>, config: Config) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        let index = Index::new(metadata_path.join("index").into_boxed_path());
        let database = Database::new(metadata_path.join("blobs").into_boxed_path());
        let commits = CommitStore::new(metadata_path.join("commits").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.clone().into_boxed_path());
        let remotes = Remotes::new(metadata_path.join("remotes").into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            config,
            index: Arc::new(Mutex::new(index)),
            database,
            commits,
            workspace,
            refs,
            remotes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `.gitlet` directory
    pub fn metadata_path(&self) -> Box<Path> {
        self.path.join(METADATA_DIR).into_boxed_path()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn commits(&self) -> &CommitStore {
        &self.commits
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn remotes(&self) -> &Remotes {
        &self.remotes
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(RepositoryError::NotInitialized.into());
        }

        Ok(())
    }

    /// Head commit of the current branch
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_oid = self.refs.read_head()?;
        let head = self.commits.restore(&head_oid)?;

        Ok((head_oid, head))
    }
}
