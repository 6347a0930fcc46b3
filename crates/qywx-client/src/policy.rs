// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-principal authentication policy.

use qywx_core::PrincipalKind;

/// How a principal's token is attached and which status codes mean the
/// token is invalid or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthPolicy {
    /// The principal this policy applies to.
    pub principal: PrincipalKind,
    /// Query parameter carrying the token.
    pub token_param: &'static str,
    /// Application codes that trigger one refresh-and-replay.
    pub credential_codes: &'static [i64],
}

/// Invalid credential (40001) and expired token (42001).
pub const CORP_CREDENTIAL_CODES: &[i64] = &[40001, 42001];

/// Invalid suite token (42004), expired suite token (42009), and a suite
/// ticket that no longer matches (48003).
pub const SUITE_CREDENTIAL_CODES: &[i64] = &[42004, 42009, 48003];

/// Codes for corp tokens minted through a suite. Same values as a direct
/// corp today, kept separate so the two can diverge.
pub const AUTHORIZED_CORP_CREDENTIAL_CODES: &[i64] = &[40001, 42001];

impl AuthPolicy {
    /// A corp calling with its own secret.
    pub const CORP: Self = Self {
        principal: PrincipalKind::Corp,
        token_param: "access_token",
        credential_codes: CORP_CREDENTIAL_CODES,
    };

    /// A third-party suite.
    pub const SUITE: Self = Self {
        principal: PrincipalKind::Suite,
        token_param: "suite_access_token",
        credential_codes: SUITE_CREDENTIAL_CODES,
    };

    /// A corp that authorized a suite.
    pub const AUTHORIZED_CORP: Self = Self {
        principal: PrincipalKind::AuthorizedCorp,
        token_param: "access_token",
        credential_codes: AUTHORIZED_CORP_CREDENTIAL_CODES,
    };

    /// Returns the default policy for a principal type.
    pub fn for_principal(principal: PrincipalKind) -> Self {
        match principal {
            PrincipalKind::Corp => Self::CORP,
            PrincipalKind::Suite => Self::SUITE,
            PrincipalKind::AuthorizedCorp => Self::AUTHORIZED_CORP,
        }
    }

    /// Returns true if `code` means the token must be refreshed.
    pub fn is_credential_failure(&self, code: i64) -> bool {
        self.credential_codes.contains(&code)
    }
}
