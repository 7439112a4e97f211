use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Closed set of attendance codes. Never extended at runtime; unknown input
/// deserializes to an error, an empty cell is `Unset` (`-`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    ToSchema,
)]
pub enum AttendanceStatus {
    P,
    A,
    PL,
    CL,
    SL,
    LWP,
    HD,
    OT,
    WO,
    H,
    #[serde(rename = "-")]
    #[strum(serialize = "-")]
    Unset,
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        AttendanceStatus::Unset
    }
}

/// Fixed display style for one attendance code.
pub struct StatusStyle {
    pub label: &'static str,
    pub full_label: &'static str,
    pub classes: &'static str,
}

impl AttendanceStatus {
    /// Pure lookup; `Unset` gets the dash placeholder with a neutral style.
    pub fn style(&self) -> StatusStyle {
        use AttendanceStatus::*;
        match self {
            P => StatusStyle {
                label: "P",
                full_label: "Present",
                classes: "bg-green-100 text-green-800",
            },
            A => StatusStyle {
                label: "A",
                full_label: "Absent",
                classes: "bg-red-100 text-red-800",
            },
            PL => StatusStyle {
                label: "PL",
                full_label: "Privileged Leave",
                classes: "bg-blue-100 text-blue-800",
            },
            CL => StatusStyle {
                label: "CL",
                full_label: "Casual Leave",
                classes: "bg-indigo-100 text-indigo-800",
            },
            SL => StatusStyle {
                label: "SL",
                full_label: "Sick Leave",
                classes: "bg-purple-100 text-purple-800",
            },
            LWP => StatusStyle {
                label: "LWP",
                full_label: "Leave Without Pay",
                classes: "bg-orange-100 text-orange-800",
            },
            HD => StatusStyle {
                label: "HD",
                full_label: "Half Day",
                classes: "bg-yellow-100 text-yellow-800",
            },
            OT => StatusStyle {
                label: "OT",
                full_label: "Overtime",
                classes: "bg-teal-100 text-teal-800",
            },
            WO => StatusStyle {
                label: "WO",
                full_label: "Weekly Off",
                classes: "bg-gray-200 text-gray-600",
            },
            H => StatusStyle {
                label: "H",
                full_label: "Holiday",
                classes: "bg-pink-100 text-pink-800",
            },
            Unset => StatusStyle {
                label: "-",
                full_label: "Not Marked",
                classes: "bg-white text-gray-400",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_round_trip_through_strings() {
        for status in AttendanceStatus::iter() {
            let code = status.to_string();
            assert_eq!(AttendanceStatus::from_str(&code).unwrap(), status);
        }
        assert_eq!(AttendanceStatus::Unset.to_string(), "-");
    }

    #[test]
    fn unset_maps_to_dash_placeholder() {
        let style = AttendanceStatus::Unset.style();
        assert_eq!(style.label, "-");
        assert_eq!(style.full_label, "Not Marked");
    }

    #[test]
    fn serde_uses_short_codes() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::LWP).unwrap(),
            "\"LWP\""
        );
        assert_eq!(
            serde_json::from_str::<AttendanceStatus>("\"-\"").unwrap(),
            AttendanceStatus::Unset
        );
    }
}
