//! Wiring of the executor, guards, skills and tool adapters from config.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use agentcore_config::Config;
use agentcore_protocols::skill::{SkillRoot, SkillScope};
use agentcore_protocols::tool::Tool;
use agentcore_security::{OutputSanitizer, PathValidator};
use agentcore_skills_dynamic::{FilesystemSkillSource, Preprocessor, SkillRegistry};
use agentcore_tools_code::RepoSearchTool;
use agentcore_tools_shell::{BackgroundTool, CommandExecutor, ExecTool};

pub(crate) struct App {
    pub config: Config,
    pub work_dir: PathBuf,
    pub executor: Arc<CommandExecutor>,
    pub paths: Arc<PathValidator>,
    pub sanitizer: Arc<OutputSanitizer>,
}

impl App {
    pub fn new(config: Config, work_dir: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let allowed: Vec<PathBuf> = config
            .security
            .allowed_paths()
            .into_iter()
            .map(|dir| if dir.is_absolute() { dir } else { work_dir.join(dir) })
            .collect();
        let paths = Arc::new(PathValidator::new(allowed)?);
        let sanitizer =
            Arc::new(OutputSanitizer::new().with_patterns(&config.security.redaction_patterns)?);
        debug!(
            "Sanitizer loaded with {} patterns",
            sanitizer.pattern_count()
        );

        Ok(Self {
            config,
            work_dir,
            executor: Arc::new(CommandExecutor::new()),
            paths,
            sanitizer,
        })
    }

    /// Configured roots plus `<work_dir>/skills` as a project root when present.
    pub fn skill_roots(&self) -> Vec<SkillRoot> {
        let mut roots = self.config.skills.skill_roots();
        let workspace = self.work_dir.join("skills");
        if workspace.is_dir() && !roots.iter().any(|r| r.path == workspace) {
            roots.push(SkillRoot::new(workspace, SkillScope::Project));
        }
        roots
    }

    pub async fn load_skills(&self) -> Result<SkillRegistry, Box<dyn std::error::Error>> {
        let registry = SkillRegistry::new();
        let roots = self.skill_roots();
        for root in roots.iter().filter(|r| !Path::new(&r.path).exists()) {
            warn!("Skill root does not exist: {}", root.path.display());
        }
        registry
            .initialize(&FilesystemSkillSource::new(), &roots)
            .await?;
        Ok(registry)
    }

    pub fn preprocessor(&self) -> Preprocessor {
        let executor = &self.config.executor;
        Preprocessor::new(self.executor.clone())
            .with_shell(&executor.shell)
            .with_timeout(executor.preprocess_timeout())
            .with_max_output_bytes(executor.max_output_bytes)
            .with_working_dir(&self.work_dir)
    }

    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        let shell = &self.config.executor.shell;
        let exec = ExecTool::new(self.executor.clone())
            .with_shell(shell)
            .with_default_timeout(self.config.executor.default_timeout())
            .with_path_validator(self.paths.clone())
            .with_sanitizer(self.sanitizer.clone());
        let background = BackgroundTool::new(self.executor.clone()).with_shell(shell);
        let search = RepoSearchTool::new(self.executor.clone())
            .with_path_validator(self.paths.clone())
            .with_sanitizer(self.sanitizer.clone());

        let tools: [Arc<dyn Tool>; 3] = [Arc::new(exec), Arc::new(background), Arc::new(search)];
        tools.into()
    }
}
