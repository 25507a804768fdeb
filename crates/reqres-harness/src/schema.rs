// crates/reqres-harness/src/schema.rs
// ============================================================================
// Module: Response Schemas
// Description: File-backed JSON Schema loading and structural validation.
// Purpose: Map logical response shapes to compiled validators.
// Dependencies: jsonschema, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Schemas live as JSON documents in the `schemas/` directory next to this
//! crate's manifest. They are read and compiled on every request for a
//! validator; nothing is cached, so edits on disk are picked up immediately.
//! A failed validation yields [`SchemaViolation`], which is deliberately a
//! different type from [`crate::ExpectationError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Directory name holding schema documents, relative to the crate manifest.
pub const SCHEMA_DIR_NAME: &str = "schemas";

/// Returns the fixed schema directory shipped with this crate.
#[must_use]
pub fn schema_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(SCHEMA_DIR_NAME)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or compiling a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Name is empty or escapes the schema directory.
    #[error("invalid schema name {name:?}")]
    InvalidName {
        /// Rejected name.
        name: String,
    },
    /// No schema file exists for the name.
    #[error("schema {name} not found at {}", path.display())]
    NotFound {
        /// Requested name.
        name: String,
        /// Resolved path.
        path: PathBuf,
    },
    /// Schema file could not be read.
    #[error("failed to read schema {}: {source}", path.display())]
    Io {
        /// Resolved path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Schema file is not valid JSON.
    #[error("schema {name} is not valid json: {source}")]
    Parse {
        /// Requested name.
        name: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// Schema document is not a valid JSON Schema.
    #[error("schema {name} failed to compile: {message}")]
    Compile {
        /// Requested name.
        name: String,
        /// Compiler message.
        message: String,
    },
}

/// A response body that does not conform to its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("response does not match schema {schema}: {}", errors.join("; "))]
pub struct SchemaViolation {
    /// Schema name.
    pub schema: String,
    /// One message per validation error.
    pub errors: Vec<String>,
}

// ============================================================================
// SECTION: Logical Schemas
// ============================================================================

/// Logical identifiers for the response shapes of the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResponseSchema {
    /// `GET /api/users` page.
    ListUsers,
    /// `GET /api/users/{id}` for an existing user.
    SingleUser,
    /// `GET /api/users/{id}` for a missing user.
    UserNotFound,
    /// `POST /api/users`.
    CreateUser,
    /// `PATCH /api/users/{id}`.
    UpdateUser,
    /// `POST /api/register` with email and password.
    RegisterSuccessful,
    /// `POST /api/register` without a password.
    RegisterUnsuccessful,
    /// `POST /api/login`.
    LoginSuccessful,
}

impl ResponseSchema {
    /// Every logical schema.
    pub const ALL: [Self; 8] = [
        Self::ListUsers,
        Self::SingleUser,
        Self::UserNotFound,
        Self::CreateUser,
        Self::UpdateUser,
        Self::RegisterSuccessful,
        Self::RegisterUnsuccessful,
        Self::LoginSuccessful,
    ];

    /// Returns the schema file name.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::ListUsers => "get_list_users.json",
            Self::SingleUser => "get_single_user.json",
            Self::UserNotFound => "get_single_user_not_found.json",
            Self::CreateUser => "post_create_user.json",
            Self::UpdateUser => "patch_update_user.json",
            Self::RegisterSuccessful => "post_register_successful.json",
            Self::RegisterUnsuccessful => "post_register_unsuccessful.json",
            Self::LoginSuccessful => "post_login_successful.json",
        }
    }
}

impl fmt::Display for ResponseSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Reads schema documents from a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLoader {
    /// Directory holding schema files.
    dir: PathBuf,
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new(schema_dir())
    }
}

impl SchemaLoader {
    /// Creates a loader rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    /// Returns the schema directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads and parses the named schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the name is invalid, the file is missing or
    /// unreadable, or its content is not JSON.
    pub fn load(&self, name: &str) -> Result<Value, SchemaError> {
        validate_name(name)?;
        let path = self.dir.join(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SchemaError::NotFound {
                    name: name.to_string(),
                    path,
                });
            }
            Err(source) => {
                return Err(SchemaError::Io {
                    path,
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| SchemaError::Parse {
            name: name.to_string(),
            source,
        })
    }

    /// Loads and compiles the named schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when loading or compilation fails.
    pub fn compile(&self, name: &str) -> Result<SchemaValidator, SchemaError> {
        let schema = self.load(name)?;
        SchemaValidator::compile(name, &schema)
    }

    /// Loads and compiles the validator for a logical schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when loading or compilation fails.
    pub fn validator(&self, schema: ResponseSchema) -> Result<SchemaValidator, SchemaError> {
        self.compile(schema.file_name())
    }
}

/// Reads and parses a schema from the fixed schema directory.
///
/// # Errors
///
/// Returns [`SchemaError`] when the name does not resolve or the file is not JSON.
pub fn load_json_schema(name: &str) -> Result<Value, SchemaError> {
    SchemaLoader::default().load(name)
}

/// Rejects names that are empty or would leave the schema directory.
fn validate_name(name: &str) -> Result<(), SchemaError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(SchemaError::InvalidName {
            name: name.to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Compiled JSON Schema (draft 2020-12) bound to its name.
pub struct SchemaValidator {
    /// Schema name used in violation reports.
    name: String,
    /// Compiled validator.
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").field("name", &self.name).finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compiles a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] when the document is not a valid schema.
    pub fn compile(name: impl Into<String>, schema: &Value) -> Result<Self, SchemaError> {
        let name = name.into();
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|err| SchemaError::Compile {
                name: name.clone(),
                message: err.to_string(),
            })?;
        Ok(Self {
            name,
            validator,
        })
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true when the instance conforms.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Validates an instance, collecting every error.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaViolation`] when the instance does not conform.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaViolation> {
        let errors: Vec<String> =
            self.validator.iter_errors(instance).map(|err| err.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolation {
                schema: self.name.clone(),
                errors,
            })
        }
    }
}
