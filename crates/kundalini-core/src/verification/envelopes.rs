//! Fixed request bodies of the verification protocol.

use chrono::{Months, NaiveDate};
use kundalini_types::DataHandle;
use serde_json::{json, Value};

/// Length of the history window requested from `getInformation`.
pub const LOOKBACK_YEARS: u32 = 5;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Body posted to `mobile/signin`. Credentials travel in the `Authorization` header.
pub fn login_envelope() -> Value {
    json!({
        "clientid": "RMNativeApp",
        "common": {
            "channelIndicator": "Mobile",
            "clientAppId": "RMNativeApp",
            "deviceInfo": {
                "deviceModel": "iPhone",
                "hardwareId": "956028013f3742ifhesdjkfhdsjkfhkds0d",
                "osBuild": "iPhone OS5.1.1",
                "timeStamp": "1347387999006",
                "timeZoneOffset": "49845767296"
            },
            "locale": {
                "country": "USA",
                "language": "english"
            },
            "requestType": "upload"
        },
        "face": "en_US",
        "rememberme": "yes",
        "remembermeenabled": "false"
    })
}

/// Body posted to `mobile/v1/dataBlob`.
pub fn common_envelope() -> Value {
    json!({
        "common": {
            "appVersion": "8.3",
            "channelIndicator": "iOS/Andriod/Desktop",
            "clientAppId": "OpenMobileApp",
            "deviceInfo": {
                "deviceModel": "iPhone Simulator",
                "hardwareId": "1E8DBD15-37BD-4B06-BC8D-76BA2ja0084WW",
                "platformOS": "iPhone OS",
                "platformOSVersion": "6.1",
                "timeStamp": "1375211314202",
                "timeZoneOffset": "4269767296"
            },
            "locale": {
                "country": "USA",
                "language": "english"
            }
        }
    })
}

/// Body posted to `mobile/v3/getInformation` for one data handle.
pub fn information_request(handle: &DataHandle, from_date: &str, to_date: &str) -> Value {
    json!({
        "requestData": {
            "qbStatusReqd": true,
            "demogReqd": true,
            "consumercontentBoardReqd": false,
            "corpcontentBoardReqd": true,
            "opencontentBoardReqd": true,
            "contentContext": [
                {
                    "key": handle.key,
                    "accountToken": handle.account_token
                }
            ],
            "request": {
                "qbDetailReqd": true,
                "timePeriodsReqd": true,
                "includeAllTags": true,
                "infoRequest": {
                    "realTime": true,
                    "fragments": {
                        "deal": true
                    },
                    "tpIndex": [-99],
                    "transactionRequest": {
                        "pagination": {
                            "startRecord": 1,
                            "recordsPerPage": 250
                        },
                        "sortCriteria": {
                            "sortBy": 1,
                            "sortOrder": "DESC"
                        },
                        "filterCriteria": {
                            "fromDate": from_date,
                            "toDate": to_date
                        },
                        "includeAdditionalInfo": {
                            "category": true,
                            "tags": true,
                            "otherAttributes": false,
                            "etd": false,
                            "split": false
                        }
                    }
                }
            }
        },
        "common": {
            "deviceInfo": {
                "deviceModel": "SM-GEJR0U1",
                "hardwareId": "a214UOFbc5251e",
                "timeStamp": "1550599513",
                "timeZoneOffset": "19800000",
                "platformOSVersion": "Android OS 8.0.0",
                "platformOS": "AndroidOS"
            },
            "channelIndicator": "Mobile",
            "clientAppId": "RMNativeApp",
            "locale": {
                "language": "english",
                "country": "USA"
            },
            "requestType": null
        }
    })
}

/// `(fromDate, toDate)` for a window ending on `today`.
///
/// `fromDate` is the same calendar day [`LOOKBACK_YEARS`] earlier; Feb 29
/// clamps to Feb 28.
pub fn lookback_window(today: NaiveDate) -> (String, String) {
    let from = today.checked_sub_months(Months::new(LOOKBACK_YEARS * 12)).unwrap_or(NaiveDate::MIN);
    (from.format(DATE_FORMAT).to_string(), today.format(DATE_FORMAT).to_string())
}

/// [`lookback_window`] for the current UTC date.
pub fn current_lookback_window() -> (String, String) {
    lookback_window(chrono::Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_lookback_window() {
        assert_eq!(
            lookback_window(date(2024, 6, 15)),
            ("2019-06-15".to_string(), "2024-06-15".to_string())
        );
        assert_eq!(
            lookback_window(date(2024, 1, 3)),
            ("2019-01-03".to_string(), "2024-01-03".to_string())
        );
    }

    #[test]
    fn test_lookback_window_clamps_leap_day() {
        assert_eq!(
            lookback_window(date(2024, 2, 29)),
            ("2019-02-28".to_string(), "2024-02-29".to_string())
        );
    }

    #[test]
    fn test_information_request_carries_handle_and_window() {
        let body = information_request(&DataHandle::new("k1", "tok1"), "2019-06-15", "2024-06-15");
        let context = &body["requestData"]["contentContext"][0];
        assert_eq!(context["key"], "k1");
        assert_eq!(context["accountToken"], "tok1");

        let filter =
            &body["requestData"]["request"]["infoRequest"]["transactionRequest"]["filterCriteria"];
        assert_eq!(filter["fromDate"], "2019-06-15");
        assert_eq!(filter["toDate"], "2024-06-15");
        assert!(body["common"]["requestType"].is_null());
    }

    #[test]
    fn test_fixed_envelopes() {
        assert_eq!(login_envelope()["clientid"], "RMNativeApp");
        assert_eq!(login_envelope()["common"]["requestType"], "upload");
        assert_eq!(common_envelope()["common"]["clientAppId"], "OpenMobileApp");
    }
}
