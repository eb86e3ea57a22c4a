// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Login credentials.

use std::env;

use crate::error::{FeedError, FeedResult};

/// Environment variable holding the login email.
pub const EMAIL_ENV_VAR: &str = "ALPHAHUB_EMAIL";
/// Environment variable holding the login password.
pub const PASSWORD_ENV_VAR: &str = "ALPHAHUB_PASSWORD";

/// AlphaHub login credentials.
///
/// Both fields are validated non-empty at construction. The `Debug` implementation
/// redacts the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    email: String,
    password: String,
}

impl Credential {
    /// Creates a credential pair.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Configuration`] if either field is empty.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> FeedResult<Self> {
        let email = email.into();
        let password = password.into();
        if email.is_empty() {
            return Err(FeedError::Configuration(
                "email must not be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(FeedError::Configuration(
                "password must not be empty".to_string(),
            ));
        }
        Ok(Self { email, password })
    }

    /// Resolves credentials from `ALPHAHUB_EMAIL` and `ALPHAHUB_PASSWORD`, loading a
    /// local `.env` file first when one is present.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Configuration`] if either variable is unset or empty.
    pub fn from_env() -> FeedResult<Self> {
        dotenvy::dotenv().ok();
        let email = env::var(EMAIL_ENV_VAR)
            .map_err(|_| FeedError::Configuration(format!("{EMAIL_ENV_VAR} is not set")))?;
        let password = env::var(PASSWORD_ENV_VAR)
            .map_err(|_| FeedError::Configuration(format!("{PASSWORD_ENV_VAR} is not set")))?;
        Self::new(email, password)
    }

    /// Login email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Login password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Credential))
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
