use std::str::FromStr;

use serde::Deserialize;

use crate::video_ref::to_locator;

/// Wire naming convention spoken by the deployed service. Chosen once at
/// startup, never re-detected per call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractVariant {
    #[default]
    Current,
    Legacy,
}

pub struct ContractConfig {
    pub search_path: &'static str,
    pub search_query_param: &'static str,
    pub search_limit_param: &'static str,
    pub in_video_path: &'static str,
    pub summarize_path: &'static str,
    pub health_path: &'static str,
    /// Body key for the outbound video reference, always sent as a locator.
    pub video_ref_field: &'static str,
    /// Row identifier key; `row_id_alias` is accepted when it is absent.
    pub row_id_field: &'static str,
    pub row_id_alias: &'static str,
}

impl ContractVariant {
    pub fn config(&self) -> ContractConfig {
        match self {
            ContractVariant::Current => ContractConfig {
                search_path: "/api/search",
                search_query_param: "query",
                search_limit_param: "maxresults",
                in_video_path: "/api/invideo_search",
                summarize_path: "/api/summarize",
                health_path: "/health",
                video_ref_field: "video_url",
                row_id_field: "video_id",
                row_id_alias: "id",
            },
            ContractVariant::Legacy => ContractConfig {
                search_path: "/api/search",
                search_query_param: "query",
                search_limit_param: "max_results",
                in_video_path: "/api/invideo-search",
                summarize_path: "/api/summarize",
                health_path: "/health",
                video_ref_field: "video_url",
                row_id_field: "video_id",
                row_id_alias: "id",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContractVariant::Current => "current",
            ContractVariant::Legacy => "legacy",
        }
    }

    /// Shape a caller's video reference for the wire. Both services hand it
    /// to a transcriber, so bare ids are expanded to a watch locator.
    pub fn wire_video_ref(&self, video_ref: &str) -> String {
        to_locator(video_ref)
    }
}

impl FromStr for ContractVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(ContractVariant::Current),
            "legacy" => Ok(ContractVariant::Legacy),
            other => Err(format!(
                "unknown contract variant {other:?} (expected \"current\" or \"legacy\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_differ_in_wire_names() {
        let current = ContractVariant::Current.config();
        let legacy = ContractVariant::Legacy.config();
        assert_eq!(current.search_limit_param, "maxresults");
        assert_eq!(legacy.search_limit_param, "max_results");
        assert_eq!(current.in_video_path, "/api/invideo_search");
        assert_eq!(legacy.in_video_path, "/api/invideo-search");
    }

    #[test]
    fn test_wire_video_ref() {
        assert_eq!(
            ContractVariant::Current.wire_video_ref("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            ContractVariant::Legacy.wire_video_ref("https://youtu.be/dQw4w9WgXcQ"),
            "https://youtu.be/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_legacy_keys_match_current() {
        let current = ContractVariant::Current.config();
        let legacy = ContractVariant::Legacy.config();
        assert_eq!(legacy.video_ref_field, "video_url");
        assert_eq!(legacy.row_id_field, "video_id");
        assert_eq!(legacy.video_ref_field, current.video_ref_field);
        assert_eq!(legacy.row_id_field, current.row_id_field);
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!("Legacy".parse(), Ok(ContractVariant::Legacy));
        assert_eq!(" current ".parse(), Ok(ContractVariant::Current));
        assert!("v3".parse::<ContractVariant>().is_err());
    }
}
