//! CSV fixtures shared by the data and query tests.

/// Cases in the source layout. Australia and Canada only have province
/// rows; Canada also has a row without coordinates.
pub const CASES_CSV: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
,Afghanistan,33.93911,67.709953,0,1,3
Australian Capital Territory,Australia,-35.4735,149.0124,2,4,5
New South Wales,Australia,-33.8688,151.2093,1,3,3
,\"Korea, South\",35.907757,127.766922,10,15,27
Alberta,Canada,53.9333,-116.5765,0,0,1
Ontario,Canada,51.2538,-85.3232,1,1,2
Repatriated Travellers,Canada,,,0,0,0
";

/// Deaths matching [`CASES_CSV`]. New South Wales carries a downward
/// correction on the last day.
pub const DEATHS_CSV: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
,Afghanistan,33.93911,67.709953,0,0,0
Australian Capital Territory,Australia,-35.4735,149.0124,0,1,1
New South Wales,Australia,-33.8688,151.2093,0,2,1
,\"Korea, South\",35.907757,127.766922,0,1,2
Alberta,Canada,53.9333,-116.5765,0,0,0
Ontario,Canada,51.2538,-85.3232,0,0,1
Repatriated Travellers,Canada,,,0,0,0
";

/// Two provinces of one country over two days.
pub const SCENARIO_CSV: &str = "\
Province/State,Country/Region,Lat,Long,1/1/20,1/2/20
A,CountryY,10.0,20.0,10,15
B,CountryY,11.0,21.0,5,5
";
