//! Column-name groups for the BTS on-time flight-delay dataset.
//!
//! Groups are ordered slices of column identifiers; overlap between groups
//! is intentional (the scheduled/actual time fields appear in several).

/// Date parts and the flight date itself
pub const DATE_COLS: &[&str] = &[
    "Year",
    "Quarter",
    "Month",
    "DayofMonth",
    "DayOfWeek",
    "FlightDate",
];

/// Carrier and airframe identity
pub const FLIGHT_INFO_COLS: &[&str] = &[
    "Reporting_Airline",
    "Airline_Name",
    "Tail_Number",
    "Flight_Number_Reporting_Airline",
    "Flight_Id",
];

/// Origin airport fields
pub const ORIGIN_COLS: &[&str] = &[
    "OriginAirportID",
    "Origin",
    "OriginCityName",
    "OriginState",
    "OriginStateName",
];

/// Destination airport fields
pub const DEST_COLS: &[&str] = &[
    "DestAirportID",
    "Dest",
    "DestCityName",
    "DestState",
    "DestStateName",
];

/// Departure times and delay buckets
pub const DEP_COLS: &[&str] = &[
    "CRSDepTime",
    "DepTime",
    "DepDelay",
    "DepDelayMinutes",
    "DepDel15",
    "DepartureDelayGroups",
];

/// Ground movement between gate and runway
pub const TAXI_COLS: &[&str] = &["TaxiOut", "WheelsOff", "WheelsOn", "TaxiIn"];

/// Arrival times and delay buckets
pub const ARR_COLS: &[&str] = &[
    "CRSArrTime",
    "ArrTime",
    "ArrDelay",
    "ArrDelayMinutes",
    "ArrDel15",
    "ArrivalDelayGroups",
];

/// Scheduled and actual gate times (local)
pub const TIME_COLS: &[&str] = &["CRSDepTime", "DepTime", "CRSArrTime", "ArrTime"];

/// Cancellation and diversion flags
pub const CANCEL_COLS: &[&str] = &["Cancelled", "CancellationCode", "Diverted"];

/// Distance and elapsed-time summary fields
pub const SUM_COLS: &[&str] = &[
    "Distance",
    "DistanceGroup",
    "CRSElapsedTime",
    "ActualElapsedTime",
];

/// Delay-minute attribution by cause
pub const DELAY_COLS: &[&str] = &[
    "CarrierDelay",
    "WeatherDelay",
    "NASDelay",
    "SecurityDelay",
    "LateAircraftDelay",
];

/// Diversion detail, up to five diversion legs
pub const DIV_COLS: &[&str] = &[
    "FirstDepTime",
    "TotalAddGTime",
    "LongestAddGTime",
    "DivAirportLandings",
    "DivReachedDest",
    "DivActualElapsedTime",
    "DivArrDelay",
    "DivDistance",
    "Div1Airport",
    "Div1AirportID",
    "Div1WheelsOn",
    "Div1TotalGTime",
    "Div1LongestGTime",
    "Div1WheelsOff",
    "Div1TailNum",
    "Div2Airport",
    "Div2AirportID",
    "Div2WheelsOn",
    "Div2TotalGTime",
    "Div2LongestGTime",
    "Div2WheelsOff",
    "Div2TailNum",
    "Div3Airport",
    "Div3AirportID",
    "Div3WheelsOn",
    "Div3TotalGTime",
    "Div3LongestGTime",
    "Div3WheelsOff",
    "Div3TailNum",
    "Div4Airport",
    "Div4AirportID",
    "Div4WheelsOn",
    "Div4TotalGTime",
    "Div4LongestGTime",
    "Div4WheelsOff",
    "Div4TailNum",
    "Div5Airport",
    "Div5AirportID",
    "Div5WheelsOn",
    "Div5TotalGTime",
    "Div5LongestGTime",
    "Div5WheelsOff",
    "Div5TailNum",
];

/// The base feature set used for modelling and exploration
pub const BASE_COLS: &[&str] = &[
    "Year",
    "Quarter",
    "Month",
    "DayofMonth",
    "DayOfWeek",
    "FlightDate",
    "Reporting_Airline",
    "Tail_Number",
    "Flight_Number_Reporting_Airline",
    "OriginAirportID",
    "Origin",
    "OriginCityName",
    "OriginState",
    "OriginStateName",
    "DestAirportID",
    "Dest",
    "DestCityName",
    "DestState",
    "DestStateName",
    "CRSDepTime",
    "DepTime",
    "DepDelay",
    "DepDelayMinutes",
    "DepDel15",
    "DepartureDelayGroups",
    "TaxiOut",
    "WheelsOff",
    "WheelsOn",
    "TaxiIn",
    "CRSArrTime",
    "ArrTime",
    "ArrDelay",
    "ArrDelayMinutes",
    "ArrDel15",
    "ArrivalDelayGroups",
    "Cancelled",
    "CancellationCode",
    "Diverted",
    "CRSElapsedTime",
    "ActualElapsedTime",
    "AirTime",
    "Flights",
    "Distance",
    "DistanceGroup",
    "CarrierDelay",
    "WeatherDelay",
    "NASDelay",
    "SecurityDelay",
    "LateAircraftDelay",
];

/// Gate times paired with the airport they are local to
pub const TIME_LOC_COLS: &[&str] = &[
    "Origin",
    "CRSDepTime",
    "DepTime",
    "Dest",
    "CRSArrTime",
    "ArrTime",
];

/// Gate times after conversion to UTC
pub const UTC_COLS: &[&str] = &[
    "CRSDepTime_UTC",
    "DepTime_UTC",
    "CRSArrTime_UTC",
    "ArrTime_UTC",
];

/// Registry of all groups, keyed by category name, in declaration order.
static GROUPS: &[(&str, &[&str])] = &[
    ("date", DATE_COLS),
    ("flight_info", FLIGHT_INFO_COLS),
    ("origin", ORIGIN_COLS),
    ("dest", DEST_COLS),
    ("dep", DEP_COLS),
    ("taxi", TAXI_COLS),
    ("arr", ARR_COLS),
    ("time", TIME_COLS),
    ("cancel", CANCEL_COLS),
    ("sum", SUM_COLS),
    ("delay", DELAY_COLS),
    ("div", DIV_COLS),
    ("base", BASE_COLS),
    ("time_loc", TIME_LOC_COLS),
    ("utc", UTC_COLS),
];

/// All column groups as (category name, ordered columns) pairs.
pub fn column_groups() -> &'static [(&'static str, &'static [&'static str])] {
    GROUPS
}

/// Look up a single group by its category name.
pub fn group(name: &str) -> Option<&'static [&'static str]> {
    GROUPS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, cols)| *cols)
}
