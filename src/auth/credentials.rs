//! Resolution of identity credentials from configuration and `OS_*`
//! variables.

use serde_json::{Value, json};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// A domain named by ID or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainRef {
    /// Domain ID.
    Id(String),
    /// Domain name.
    Name(String),
}

/// A user named by ID, or by name within a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// User ID.
    Id(String),
    /// User name and its domain.
    Name {
        /// User name.
        name: String,
        /// Domain of the user.
        domain: DomainRef,
    },
}

/// A project named by ID, or by name within a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    /// Project ID.
    Id(String),
    /// Project name and its domain.
    Name {
        /// Project name.
        name: String,
        /// Domain of the project.
        domain: DomainRef,
    },
}

/// How the client proves its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// User password, scoped to a project.
    Password {
        /// The authenticating user.
        user: UserRef,
        /// The user's password.
        password: String,
        /// Project the token is scoped to.
        scope: ProjectScope,
    },
    /// Application credential; the scope is fixed by the credential.
    ApplicationCredential {
        /// Credential ID, or name plus owning user.
        credential: ApplicationCredentialRef,
        /// Credential secret.
        secret: String,
    },
}

/// An application credential named by ID, or by name for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationCredentialRef {
    /// Credential ID.
    Id(String),
    /// Credential name and owning user.
    Name {
        /// Credential name.
        name: String,
        /// User owning the credential.
        user: UserRef,
    },
}

/// Everything needed to request a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Identity service URL.
    pub auth_url: String,
    /// Authentication method.
    pub method: AuthMethod,
    /// Region used to pick catalogue endpoints.
    pub region: Option<String>,
}

/// Configuration fields and the `OS_*` variables that fill them when empty.
struct Sources<'a, E: mockable::Env> {
    config: &'a AuthConfig,
    env: &'a E,
}

impl<E: mockable::Env> Sources<'_, E> {
    fn pick(&self, configured: Option<&String>, env_var: &str) -> Option<String> {
        configured
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .or_else(|| self.env.string(env_var))
            .filter(|value| !value.trim().is_empty())
    }

    fn domain(
        &self,
        id: (Option<&String>, &str),
        name: (Option<&String>, &str),
    ) -> Option<DomainRef> {
        self.pick(id.0, id.1)
            .map(DomainRef::Id)
            .or_else(|| self.pick(name.0, name.1).map(DomainRef::Name))
    }

    fn user(&self) -> Result<UserRef, AuthError> {
        if let Some(id) = self.pick(self.config.user_id.as_ref(), "OS_USER_ID") {
            return Ok(UserRef::Id(id));
        }
        let name = self
            .pick(self.config.username.as_ref(), "OS_USERNAME")
            .ok_or_else(|| missing("user_id or username"))?;
        let domain = self
            .domain(
                (self.config.user_domain_id.as_ref(), "OS_USER_DOMAIN_ID"),
                (self.config.user_domain_name.as_ref(), "OS_USER_DOMAIN_NAME"),
            )
            .ok_or_else(|| missing("user_domain_id or user_domain_name"))?;
        Ok(UserRef::Name { name, domain })
    }

    fn project(&self) -> Result<ProjectScope, AuthError> {
        if let Some(id) = self.pick(self.config.project_id.as_ref(), "OS_PROJECT_ID") {
            return Ok(ProjectScope::Id(id));
        }
        let name = self
            .pick(self.config.project_name.as_ref(), "OS_PROJECT_NAME")
            .ok_or_else(|| missing("project_id or project_name"))?;
        let domain = self
            .domain(
                (self.config.project_domain_id.as_ref(), "OS_PROJECT_DOMAIN_ID"),
                (
                    self.config.project_domain_name.as_ref(),
                    "OS_PROJECT_DOMAIN_NAME",
                ),
            )
            .ok_or_else(|| missing("project_domain_id or project_domain_name"))?;
        Ok(ProjectScope::Name { name, domain })
    }

    fn application_credential(&self, secret: String) -> Result<AuthMethod, AuthError> {
        let credential = if let Some(id) = self.pick(
            self.config.application_credential_id.as_ref(),
            "OS_APPLICATION_CREDENTIAL_ID",
        ) {
            ApplicationCredentialRef::Id(id)
        } else {
            let name = self
                .pick(
                    self.config.application_credential_name.as_ref(),
                    "OS_APPLICATION_CREDENTIAL_NAME",
                )
                .ok_or_else(|| {
                    missing("application_credential_id or application_credential_name")
                })?;
            ApplicationCredentialRef::Name {
                name,
                user: self.user()?,
            }
        };
        Ok(AuthMethod::ApplicationCredential { credential, secret })
    }
}

fn missing(field: &str) -> AuthError {
    AuthError::MissingCredentials {
        field: field.to_owned(),
    }
}

impl Credentials {
    /// Resolves credentials from `config`, filling empty fields from the
    /// `OS_*` environment variables.
    ///
    /// An application credential secret selects application-credential
    /// authentication; otherwise a password and a project scope are needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] naming the first absent
    /// field.
    pub fn resolve<E: mockable::Env>(config: &AuthConfig, env: &E) -> Result<Self, AuthError> {
        let sources = Sources { config, env };

        let auth_url = sources
            .pick(config.auth_url.as_ref(), "OS_AUTH_URL")
            .ok_or_else(|| missing("auth_url"))?;
        let region = sources.pick(config.region.as_ref(), "OS_REGION_NAME");

        let method = if let Some(secret) = sources.pick(
            config.application_credential_secret.as_ref(),
            "OS_APPLICATION_CREDENTIAL_SECRET",
        ) {
            sources.application_credential(secret)?
        } else {
            let user = sources.user()?;
            let password = sources
                .pick(config.password.as_ref(), "OS_PASSWORD")
                .ok_or_else(|| missing("password"))?;
            AuthMethod::Password {
                user,
                password,
                scope: sources.project()?,
            }
        };

        Ok(Self {
            auth_url,
            method,
            region,
        })
    }

    /// Builds the identity v3 token request body.
    #[must_use]
    pub fn request_body(&self) -> Value {
        match &self.method {
            AuthMethod::Password {
                user,
                password,
                scope,
            } => {
                let mut user_json = user_json(user);
                if let Some(object) = user_json.as_object_mut() {
                    object.insert(String::from("password"), Value::String(password.clone()));
                }
                json!({
                    "auth": {
                        "identity": {
                            "methods": ["password"],
                            "password": { "user": user_json }
                        },
                        "scope": { "project": project_json(scope) }
                    }
                })
            }
            AuthMethod::ApplicationCredential { credential, secret } => {
                let credential_json = match credential {
                    ApplicationCredentialRef::Id(id) => json!({ "id": id, "secret": secret }),
                    ApplicationCredentialRef::Name { name, user } => {
                        json!({ "name": name, "user": user_json(user), "secret": secret })
                    }
                };
                json!({
                    "auth": {
                        "identity": {
                            "methods": ["application_credential"],
                            "application_credential": credential_json
                        }
                    }
                })
            }
        }
    }
}

fn domain_json(domain: &DomainRef) -> Value {
    match domain {
        DomainRef::Id(id) => json!({ "id": id }),
        DomainRef::Name(name) => json!({ "name": name }),
    }
}

fn user_json(user: &UserRef) -> Value {
    match user {
        UserRef::Id(id) => json!({ "id": id }),
        UserRef::Name { name, domain } => json!({ "name": name, "domain": domain_json(domain) }),
    }
}

fn project_json(scope: &ProjectScope) -> Value {
    match scope {
        ProjectScope::Id(id) => json!({ "id": id }),
        ProjectScope::Name { name, domain } => {
            json!({ "name": name, "domain": domain_json(domain) })
        }
    }
}
