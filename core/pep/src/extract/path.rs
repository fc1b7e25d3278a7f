//! Adapter for path-addressed repository operations.
use std::collections::BTreeMap;

use anyhow::Result;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::errors::MalformedRequest;

use super::fields;
use super::ExtractedFields;

/// A path-addressed call decomposed into ordered segments and query parameters.
#[derive(Clone, Debug)]
pub struct PathCall {
    query: BTreeMap<String, String>,
    raw: String,
    segments: Vec<String>,
}

impl PathCall {
    /// Decompose a request path and its query parameters into a [`PathCall`].
    ///
    /// Empty segments (from leading, trailing or doubled slashes) are skipped.
    pub fn new<P: Into<String>>(path: P, query: BTreeMap<String, String>) -> PathCall {
        let raw = path.into();
        let segments = raw
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(String::from)
            .collect();
        PathCall {
            query,
            raw,
            segments,
        }
    }

    /// The request path as received, for error reporting.
    pub fn path(&self) -> &str {
        &self.raw
    }

    /// Access a query parameter by name.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Access a path segment by position.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// The ordered path segments of the call.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Declarative extraction rule for a path-addressed operation.
///
/// The rule names which segment carries the object identifier, how many
/// segments the operation requires at a minimum, and the optional trailing
/// sub-resource and temporal query parameter the operation recognises.
#[derive(Clone, Debug)]
pub struct PathRule {
    /// Minimum number of path segments the operation requires.
    pub min_segments: usize,

    /// Position of the object identifier segment.
    pub pid_segment: usize,

    /// Optional trailing sub-resource qualifier.
    pub sub_resource: Option<PathSubResource>,

    /// Optional temporal query parameter.
    pub temporal: Option<TemporalParam>,
}

/// An optional trailing path segment qualifying the targeted sub-resource.
#[derive(Clone, Debug)]
pub struct PathSubResource {
    /// Field name the qualifier is extracted as.
    pub field: &'static str,

    /// Segment value that must precede the qualifier for it to apply.
    pub marker: &'static str,

    /// Position of the marker segment.
    pub marker_segment: usize,

    /// Position of the qualifier segment.
    pub value_segment: usize,
}

/// A recognised temporal query parameter carrying an RFC 3339 date-time.
#[derive(Clone, Debug)]
pub struct TemporalParam {
    /// Field name the parameter is extracted as.
    pub field: &'static str,

    /// Query parameter name to look for.
    pub param: &'static str,
}

impl PathRule {
    /// Extract the operation's fields from a path-addressed call.
    ///
    /// Calls with fewer segments than the operation requires fail with a
    /// [`MalformedRequest::PathTooShort`] error naming the offending path.
    /// A temporal parameter that is present but does not parse is treated as
    /// absent rather than rejected.
    pub fn extract(&self, call: &PathCall) -> Result<ExtractedFields> {
        if call.segments().len() < self.min_segments {
            let error = MalformedRequest::PathTooShort {
                path: call.path().to_string(),
            };
            return Err(error.into());
        }

        let mut extracted = ExtractedFields::new();
        if let Some(pid) = call.segment(self.pid_segment) {
            extracted.insert(fields::PID, pid.to_string());
        }

        if let Some(sub) = &self.sub_resource {
            let marked = call.segment(sub.marker_segment) == Some(sub.marker);
            if marked {
                if let Some(value) = call.segment(sub.value_segment) {
                    extracted.insert(sub.field, value.to_string());
                }
            }
        }

        if let Some(temporal) = &self.temporal {
            if let Some(raw) = call.query(temporal.param) {
                if OffsetDateTime::parse(raw, &Rfc3339).is_ok() {
                    extracted.insert(temporal.field, raw.to_string());
                }
            }
        }

        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::errors::MalformedRequest;

    use super::fields;
    use super::PathCall;
    use super::PathRule;
    use super::PathSubResource;
    use super::TemporalParam;

    fn rule() -> PathRule {
        PathRule {
            min_segments: 3,
            pid_segment: 1,
            sub_resource: Some(PathSubResource {
                field: fields::SDEF_PID,
                marker: "methods",
                marker_segment: 2,
                value_segment: 3,
            }),
            temporal: Some(TemporalParam {
                field: fields::AS_OF_DATETIME,
                param: "asOfDateTime",
            }),
        }
    }

    #[test]
    fn extract_pid_and_sub_resource() {
        let call = PathCall::new("/objects/demo:1/methods/sdef:2", BTreeMap::new());
        let extracted = rule().extract(&call).unwrap();
        assert_eq!(extracted.get(fields::PID), Some("demo:1"));
        assert_eq!(extracted.get(fields::SDEF_PID), Some("sdef:2"));
    }

    #[test]
    fn extract_without_sub_resource() {
        let call = PathCall::new("/objects/demo:1/methods", BTreeMap::new());
        let extracted = rule().extract(&call).unwrap();
        assert_eq!(extracted.get(fields::PID), Some("demo:1"));
        assert_eq!(extracted.get(fields::SDEF_PID), None);
    }

    #[test]
    fn extract_requires_min_segments() {
        let call = PathCall::new("/objects/demo:1", BTreeMap::new());
        let error = rule().extract(&call).unwrap_err();
        assert!(error.is::<MalformedRequest>());
        assert_eq!(
            error.to_string(),
            "not enough path segments on request path '/objects/demo:1'",
        );
    }

    #[test]
    fn extract_temporal_parameter() {
        let mut query = BTreeMap::new();
        query.insert("asOfDateTime".to_string(), "2024-05-01T12:00:00Z".to_string());
        let call = PathCall::new("/objects/demo:1/methods", query);
        let extracted = rule().extract(&call).unwrap();
        assert_eq!(
            extracted.get(fields::AS_OF_DATETIME),
            Some("2024-05-01T12:00:00Z"),
        );
    }

    #[test]
    fn extract_temporal_parameter_invalid_is_dropped() {
        let mut query = BTreeMap::new();
        query.insert("asOfDateTime".to_string(), "next tuesday".to_string());
        let call = PathCall::new("/objects/demo:1/methods", query);
        let extracted = rule().extract(&call).unwrap();
        assert_eq!(extracted.get(fields::AS_OF_DATETIME), None);
    }
}
