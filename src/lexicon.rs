//! # Static address lexicons
//!
//! Membership lists consulted by the feature extractor: street suffixes,
//! directionals, unit/occupancy designators and state names. These are fixed
//! reference data (USPS publication 28 suffix forms and the usual two-letter
//! state codes), not learned from any corpus.
//!
//! Lookups are case-normalized exact matches against prebuilt hash sets.

use std::collections::HashSet;

/// USPS street suffix forms and their common abbreviations, lowercase.
pub const STREET_SUFFIXES: &[&str] = &[
    "allee", "alley", "ally", "aly", "anex", "annex", "annx", "anx", "arc",
    "arcade", "av", "ave", "aven", "avenu", "avenue", "avn", "avnue", "bayoo",
    "bayou", "bch", "beach", "bend", "bg", "bgs", "blf", "blfs", "bluf",
    "bluff", "bluffs", "blvd", "bnd", "bot", "bottm", "bottom", "boul",
    "boulevard", "boulv", "br", "branch", "brdge", "brg", "bridge", "brk",
    "brks", "brnch", "brook", "brooks", "btm", "burg", "burgs", "byp", "bypa",
    "bypas", "bypass", "byps", "byu", "camp", "canyn", "canyon", "cape",
    "causeway", "causwa", "cen", "cent", "center", "centers", "centr",
    "centre", "cir", "circ", "circl", "circle", "circles", "cirs", "clb",
    "clf", "clfs", "cliff", "cliffs", "club", "cmn", "cmns", "cmp", "cnter",
    "cntr", "cnyn", "common", "commons", "cor", "corner", "corners", "cors",
    "course", "court", "courts", "cove", "coves", "cp", "cpe", "crcl", "crcle",
    "creek", "cres", "crescent", "crest", "crk", "crossing", "crossroad",
    "crossroads", "crse", "crsent", "crsnt", "crssng", "crst", "cswy", "ct",
    "ctr", "ctrs", "cts", "curv", "curve", "cv", "cvs", "cyn", "dale", "dam",
    "div", "divide", "dl", "dm", "dr", "driv", "drive", "drives", "drs", "drv",
    "dv", "dvd", "est", "estate", "estates", "ests", "exp", "expr", "express",
    "expressway", "expw", "expy", "ext", "extension", "extensions", "extn",
    "extnsn", "exts", "fall", "falls", "ferry", "field", "fields", "flat",
    "flats", "fld", "flds", "fls", "flt", "flts", "ford", "fords", "forest",
    "forests", "forg", "forge", "forges", "fork", "forks", "fort", "frd",
    "frds", "freeway", "freewy", "frg", "frgs", "frk", "frks", "frry", "frst",
    "frt", "frway", "frwy", "fry", "ft", "fwy", "garden", "gardens", "gardn",
    "gateway", "gatewy", "gatway", "gdn", "gdns", "glen", "glens", "gln",
    "glns", "grden", "grdn", "grdns", "green", "greens", "grn", "grns", "grov",
    "grove", "groves", "grv", "grvs", "gtway", "gtwy", "harb", "harbor",
    "harbors", "harbr", "haven", "hbr", "hbrs", "heights", "highway", "highwy",
    "hill", "hills", "hiway", "hiwy", "hl", "hllw", "hls", "hollow", "hollows",
    "holw", "holws", "hrbor", "ht", "hts", "hvn", "hway", "hwy", "inlet",
    "inlt", "is", "island", "islands", "isle", "isles", "islnd", "islnds",
    "iss", "jct", "jction", "jctn", "jctns", "jcts", "junction", "junctions",
    "junctn", "juncton", "key", "keys", "knl", "knls", "knol", "knoll",
    "knolls", "ky", "kys", "lake", "lakes", "land", "landing", "lane", "lck",
    "lcks", "ldg", "ldge", "lf", "lgt", "lgts", "light", "lights", "lk", "lks",
    "ln", "lndg", "lndng", "loaf", "lock", "locks", "lodg", "lodge", "loop",
    "loops", "mall", "manor", "manors", "mdw", "mdws", "meadow", "meadows",
    "medows", "mews", "mill", "mills", "mission", "missn", "ml", "mls", "mnr",
    "mnrs", "mnt", "mntain", "mntn", "mntns", "motorway", "mount", "mountain",
    "mountains", "mountin", "msn", "mssn", "mt", "mtin", "mtn", "mtns", "mtwy",
    "nck", "neck", "opas", "orch", "orchard", "orchrd", "oval", "overpass",
    "ovl", "park", "parks", "parkway", "parkways", "parkwy", "pass", "passage",
    "path", "paths", "pike", "pikes", "pine", "pines", "pkway", "pkwy",
    "pkwys", "pky", "pl", "place", "plain", "plains", "plaza", "pln", "plns",
    "plz", "plza", "pne", "pnes", "point", "points", "port", "ports", "pr",
    "prairie", "prk", "prr", "prt", "prts", "psge", "pt", "pts", "rad",
    "radial", "radiel", "radl", "ramp", "ranch", "ranches", "rapid", "rapids",
    "rd", "rdg", "rdge", "rdgs", "rds", "rest", "ridge", "ridges", "riv",
    "river", "rivr", "rnch", "rnchs", "road", "roads", "route", "row", "rpd",
    "rpds", "rst", "rte", "rue", "run", "rvr", "shl", "shls", "shoal",
    "shoals", "shoar", "shoars", "shore", "shores", "shr", "shrs", "skwy",
    "skyway", "smt", "spg", "spgs", "spng", "spngs", "spring", "springs",
    "sprng", "sprngs", "spur", "spurs", "sq", "sqr", "sqre", "sqrs", "sqs",
    "squ", "square", "squares", "st", "sta", "station", "statn", "stn", "str",
    "stra", "strav", "straven", "stravenue", "stravn", "stream", "street",
    "streets", "streme", "strm", "strt", "strvn", "strvnue", "sts", "sumit",
    "sumitt", "summit", "ter", "terr", "terrace", "throughway", "tpke",
    "trace", "traces", "track", "tracks", "trafficway", "trail", "trailer",
    "trails", "trak", "trce", "trfy", "trk", "trks", "trl", "trlr", "trlrs",
    "trls", "trnpk", "trwy", "tunel", "tunl", "tunls", "tunnel", "tunnels",
    "tunnl", "turnpike", "turnpk", "un", "underpass", "union", "unions", "uns",
    "upas", "valley", "valleys", "vally", "vdct", "via", "viadct", "viaduct",
    "view", "views", "vill", "villag", "village", "villages", "ville", "villg",
    "villiage", "vis", "vist", "vista", "vl", "vlg", "vlgs", "vlly", "vly",
    "vlys", "vst", "vsta", "vw", "vws", "walk", "walks", "wall", "way", "ways",
    "well", "wells", "wl", "wls", "wy", "xing", "xrd", "xrds",
];

/// Directional words and abbreviations, lowercase.
pub const DIRECTIONALS: &[&str] = &[
    "n", "s", "e", "w", "ne", "nw", "se", "sw",
    "north", "south", "east", "west",
    "northeast", "northwest", "southeast", "southwest",
];

/// Occupancy / unit designators per USPS publication 28, lowercase.
pub const UNIT_TYPES: &[&str] = &[
    "#", "apartment", "apt", "basement", "bsmt", "bldg", "building",
    "department", "dept", "fl", "floor", "front", "frnt", "hangar", "hngr",
    "lbby", "lobby", "lot", "lower", "lowr", "ofc", "office", "ph",
    "penthouse", "pier", "rear", "rm", "room", "side", "slip", "space", "spc",
    "ste", "stop", "suite", "trailer", "trlr", "unit", "upper", "uppr",
];

/// Two-letter state codes plus DC and the common territories, lowercase.
pub const STATE_ABBREVIATIONS: &[&str] = &[
    "al", "ak", "az", "ar", "ca", "co", "ct", "de", "dc", "fl", "ga", "hi",
    "id", "il", "in", "ia", "ks", "ky", "la", "me", "md", "ma", "mi", "mn",
    "ms", "mo", "mt", "ne", "nv", "nh", "nj", "nm", "ny", "nc", "nd", "oh",
    "ok", "or", "pa", "pr", "ri", "sc", "sd", "tn", "tx", "ut", "vt", "va",
    "vi", "wa", "wv", "wi", "wy",
];

/// Full single-word state names, lowercase. Multi-word names ("New York",
/// "Rhode Island") have no single-token form and are only recognized via
/// their two-letter abbreviations.
pub const STATE_NAMES: &[&str] = &[
    "alabama", "alaska", "arizona", "arkansas", "california", "colorado",
    "connecticut", "delaware", "florida", "georgia", "hawaii", "idaho",
    "illinois", "indiana", "iowa", "kansas", "kentucky", "louisiana", "maine",
    "maryland", "massachusetts", "michigan", "minnesota", "mississippi",
    "missouri", "montana", "nebraska", "nevada", "ohio", "oklahoma", "oregon",
    "pennsylvania", "tennessee", "texas", "utah", "vermont", "virginia",
    "washington", "wisconsin", "wyoming",
];

/// Prebuilt membership sets for O(1) case-normalized lookups.
///
/// Built once when the model is constructed and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Lexicons {
    street_suffixes: HashSet<&'static str>,
    directionals: HashSet<&'static str>,
    unit_types: HashSet<&'static str>,
    states: HashSet<&'static str>,
}

impl Lexicons {
    pub fn new() -> Self {
        Self {
            street_suffixes: STREET_SUFFIXES.iter().copied().collect(),
            directionals: DIRECTIONALS.iter().copied().collect(),
            unit_types: UNIT_TYPES.iter().copied().collect(),
            states: STATE_ABBREVIATIONS
                .iter()
                .chain(STATE_NAMES.iter())
                .copied()
                .collect(),
        }
    }

    /// Membership tests take the cleaned token form: lowercase, dots removed.
    pub fn is_street_suffix(&self, clean: &str) -> bool {
        self.street_suffixes.contains(clean)
    }

    pub fn is_directional(&self, clean: &str) -> bool {
        self.directionals.contains(clean)
    }

    pub fn is_unit_type(&self, clean: &str) -> bool {
        self.unit_types.contains(clean)
    }

    pub fn is_state(&self, clean: &str) -> bool {
        self.states.contains(clean)
    }
}

impl Default for Lexicons {
    fn default() -> Self {
        Self::new()
    }
}
