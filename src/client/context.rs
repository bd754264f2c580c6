use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::LoginResponse;
use crate::client::api::HelpDeskClient;
use crate::config;
use crate::database::models::UserSummary;
use crate::relay::Viewer;
use crate::types::CompanyId;

const SESSION_FILE: &str = "session.json";

/// The persisted client session: which server, which token, who is signed in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppContext {
    pub server_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(skip)]
    dir: PathBuf,
}

/// `MESOB_CLI_CONFIG_DIR`, or `~/.config/mesob/cli`
pub fn config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(custom_dir) = std::env::var("MESOB_CLI_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }
    let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(".config").join("mesob").join("cli"))
}

fn default_server_url() -> String {
    std::env::var("MESOB_SERVER_URL")
        .unwrap_or_else(|_| format!("http://localhost:{}", config::config().server.port))
}

impl AppContext {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(config_dir()?)
    }

    /// Missing session files give a signed-out context for the default server
    pub fn load_from(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        let file = dir.join(SESSION_FILE);

        if !file.exists() {
            return Ok(Self {
                server_url: default_server_url(),
                token: None,
                user: None,
                dir,
            });
        }

        let content = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
        let mut context: AppContext =
            serde_json::from_str(&content).with_context(|| format!("parsing {}", file.display()))?;
        context.dir = dir;
        Ok(context)
    }

    pub fn persist(&self) -> anyhow::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(self.dir.join(SESSION_FILE), content)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn login(&mut self, server_url: Option<String>, response: LoginResponse) {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        self.token = Some(response.token);
        self.user = Some(response.user);
    }

    /// Forget the token and user but keep the server
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// The signed-in user as seen from their home company
    pub fn viewer(&self) -> Option<Viewer> {
        self.user.as_ref().map(|user| Viewer {
            user_id: user.id,
            company_id: user.company_id,
            role: user.role,
        })
    }

    /// The signed-in user as seen from a joined relay room. Global admins
    /// watching another tenant take that tenant's company.
    pub fn viewer_in(&self, room: CompanyId) -> Option<Viewer> {
        self.viewer().map(|viewer| Viewer {
            company_id: room,
            ..viewer
        })
    }

    /// An API client carrying the session token, if any
    pub fn client(&self) -> anyhow::Result<HelpDeskClient> {
        let client = HelpDeskClient::new(&self.server_url)?;
        Ok(match &self.token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use uuid::Uuid;

    fn response() -> LoginResponse {
        LoginResponse {
            token: "token-1".to_string(),
            user: UserSummary {
                id: Uuid::new_v4(),
                name: "Abebe Girma".to_string(),
                email: "abebe@mesob.et".to_string(),
                role: Role::Employee,
                company_id: 1,
                technician_id: None,
            },
            expires_in: 3600,
        }
    }

    #[test]
    fn missing_session_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let context = AppContext::load_from(dir.path()).unwrap();
        assert!(!context.is_authenticated());
        assert!(context.viewer().is_none());
    }

    #[test]
    fn login_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = AppContext::load_from(dir.path()).unwrap();
        context.login(Some("http://desk.local:5000".to_string()), response());
        context.persist().unwrap();

        let reloaded = AppContext::load_from(dir.path()).unwrap();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.server_url, "http://desk.local:5000");
        assert_eq!(reloaded.token.as_deref(), Some("token-1"));
        let viewer = reloaded.viewer().unwrap();
        assert_eq!(viewer.company_id, 1);
        assert_eq!(viewer.role, Role::Employee);
        assert_eq!(Some(viewer.user_id), reloaded.user.as_ref().map(|u| u.id));
    }

    #[test]
    fn room_viewer_takes_the_room_company() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = AppContext::load_from(dir.path()).unwrap();
        context.login(None, response());

        let home = context.viewer().unwrap();
        let away = context.viewer_in(2).unwrap();
        assert_eq!(away.company_id, 2);
        assert_eq!(away.role, home.role);
        assert_eq!(away.user_id, home.user_id);
    }

    #[test]
    fn clearing_keeps_the_server() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = AppContext::load_from(dir.path()).unwrap();
        context.login(Some("http://desk.local:5000".to_string()), response());
        context.clear();
        context.persist().unwrap();

        let reloaded = AppContext::load_from(dir.path()).unwrap();
        assert!(!reloaded.is_authenticated());
        assert_eq!(reloaded.server_url, "http://desk.local:5000");
    }

    #[test]
    fn corrupt_session_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        assert!(AppContext::load_from(dir.path()).is_err());
    }
}
