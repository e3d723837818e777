//! The backend's response envelope.
//!
//! Every endpoint answers with `{"code": .., "msg": .., "data": .., "total": ..}`.
//! Only `code` is required; `total` appears on paged listings.

use serde::{Deserialize, Serialize};

/// Envelope code the backend uses for success.
pub const SUCCESS_CODE: i64 = 200;

/// Result codes the backend is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    ParamError,
    DataNotFound,
    SystemError,
}

impl ResultCode {
    pub fn code(self) -> i64 {
        match self {
            ResultCode::Success => 200,
            ResultCode::ParamError => 400,
            ResultCode::DataNotFound => 404,
            ResultCode::SystemError => 500,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            200 => Some(ResultCode::Success),
            400 => Some(ResultCode::ParamError),
            404 => Some(ResultCode::DataNotFound),
            500 => Some(ResultCode::SystemError),
            _ => None,
        }
    }
}

/// Response wrapper produced by every backend endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: Some("success".to_string()),
            data: Some(data),
            total: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    pub fn result_code(&self) -> Option<ResultCode> {
        ResultCode::from_code(self.code)
    }

    /// Drop the envelope and keep the payload.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_envelope() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"code":200,"msg":"ok","data":[1,2],"total":9}"#).unwrap();
        assert!(env.is_success());
        assert_eq!(env.total, Some(9));
        assert_eq!(env.into_data(), Some(vec![1, 2]));
    }

    #[test]
    fn msg_and_data_are_optional() {
        let env: Envelope<String> = serde_json::from_str(r#"{"code":500}"#).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.result_code(), Some(ResultCode::SystemError));
        assert!(env.msg.is_none());
        assert!(env.data.is_none());
    }

    #[test]
    fn explicit_null_data_is_none() {
        let env: Envelope<String> =
            serde_json::from_str(r#"{"code":404,"msg":"gone","data":null}"#).unwrap();
        assert_eq!(env.result_code(), Some(ResultCode::DataNotFound));
        assert!(env.data.is_none());
    }

    #[test]
    fn unknown_code_has_no_result_code() {
        assert_eq!(ResultCode::from_code(418), None);
        assert_eq!(ResultCode::ParamError.code(), 400);
    }

    #[test]
    fn success_omits_empty_fields() {
        let json = serde_json::to_value(Envelope::success(true)).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["data"], true);
        assert!(json.get("total").is_none());
    }
}
