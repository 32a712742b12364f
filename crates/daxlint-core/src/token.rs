//! Token types produced by the lexer and consumed by every analysis pass.

use serde::{Deserialize, Serialize};

/// Lane a token travels on.
///
/// Channels partition one character stream: code tokens are what the rules
/// look at, hidden tokens carry whitespace, comment tokens carry comments, and
/// keyword tokens carry the statement keywords (`VAR`, `RETURN`, ...) that
/// some passes need while others skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Ordinary code.
    Code,
    /// Whitespace.
    Hidden,
    /// Single-line and delimited comments.
    Comment,
    /// Statement keywords used for linting.
    Keyword,
}

macro_rules! builtins {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Built-in DAX functions the lexer distinguishes by name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum Builtin {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl Builtin {
            /// Returns the canonical upper-case spelling.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Looks up a function by name, ignoring case.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name.to_ascii_uppercase().as_str() {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

builtins! {
    Abs => "ABS",
    AccrInt => "ACCRINT",
    AccrIntM => "ACCRINTM",
    Acos => "ACOS",
    Acosh => "ACOSH",
    Acot => "ACOT",
    Acoth => "ACOTH",
    AddColumns => "ADDCOLUMNS",
    AddMissingItems => "ADDMISSINGITEMS",
    All => "ALL",
    AllCrossFiltered => "ALLCROSSFILTERED",
    AllExcept => "ALLEXCEPT",
    AllNoBlankRow => "ALLNOBLANKROW",
    AllSelected => "ALLSELECTED",
    AmorDegrc => "AMORDEGRC",
    AmorLinc => "AMORLINC",
    And => "AND",
    ApproximateDistinctCount => "APPROXIMATEDISTINCTCOUNT",
    Asin => "ASIN",
    Asinh => "ASINH",
    Atan => "ATAN",
    Atanh => "ATANH",
    Average => "AVERAGE",
    AverageA => "AVERAGEA",
    AverageX => "AVERAGEX",
    BetaDist => "BETA.DIST",
    BetaInv => "BETA.INV",
    BitAnd => "BITAND",
    BitLShift => "BITLSHIFT",
    BitOr => "BITOR",
    BitRShift => "BITRSHIFT",
    BitXor => "BITXOR",
    Blank => "BLANK",
    Calculate => "CALCULATE",
    CalculateTable => "CALCULATETABLE",
    Calendar => "CALENDAR",
    CalendarAuto => "CALENDARAUTO",
    Ceiling => "CEILING",
    ChisqDist => "CHISQ.DIST",
    ChisqDistRt => "CHISQ.DIST.RT",
    ChisqInv => "CHISQ.INV",
    ChisqInvRt => "CHISQ.INV.RT",
    ClosingBalanceMonth => "CLOSINGBALANCEMONTH",
    ClosingBalanceQuarter => "CLOSINGBALANCEQUARTER",
    ClosingBalanceYear => "CLOSINGBALANCEYEAR",
    Coalesce => "COALESCE",
    Collapse => "COLLAPSE",
    CollapseAll => "COLLAPSEALL",
    ColumnStatistics => "COLUMNSTATISTICS",
    Combin => "COMBIN",
    CombinA => "COMBINA",
    CombineValues => "COMBINEVALUES",
    Concatenate => "CONCATENATE",
    ConcatenateX => "CONCATENATEX",
    ConfidenceNorm => "CONFIDENCE.NORM",
    ConfidenceT => "CONFIDENCE.T",
    Contains => "CONTAINS",
    ContainsRow => "CONTAINSROW",
    ContainsString => "CONTAINSSTRING",
    ContainsStringExact => "CONTAINSSTRINGEXACT",
    Convert => "CONVERT",
    Cos => "COS",
    Cosh => "COSH",
    Cot => "COT",
    Coth => "COTH",
    Count => "COUNT",
    CountA => "COUNTA",
    CountAX => "COUNTAX",
    CountBlank => "COUNTBLANK",
    CountRows => "COUNTROWS",
    CountX => "COUNTX",
    CoupDayBs => "COUPDAYBS",
    CoupDays => "COUPDAYS",
    CoupDaysNc => "COUPDAYSNC",
    CoupNcd => "COUPNCD",
    CoupNum => "COUPNUM",
    CoupPcd => "COUPPCD",
    CrossFilter => "CROSSFILTER",
    CrossJoin => "CROSSJOIN",
    CumIpmt => "CUMIPMT",
    CumPrinc => "CUMPRINC",
    Currency => "CURRENCY",
    CurrentGroup => "CURRENTGROUP",
    CustomData => "CUSTOMDATA",
    DataTable => "DATATABLE",
    Date => "DATE",
    DateAdd => "DATEADD",
    DateDiff => "DATEDIFF",
    DatesBetween => "DATESBETWEEN",
    DatesInPeriod => "DATESINPERIOD",
    DatesMtd => "DATESMTD",
    DatesQtd => "DATESQTD",
    DatesYtd => "DATESYTD",
    DateValue => "DATEVALUE",
    Day => "DAY",
    Db => "DB",
    Ddb => "DDB",
    Degrees => "DEGREES",
    DetailRows => "DETAILROWS",
    Disc => "DISC",
    Distinct => "DISTINCT",
    DistinctCount => "DISTINCTCOUNT",
    DistinctCountNoBlank => "DISTINCTCOUNTNOBLANK",
    Divide => "DIVIDE",
    DollarDe => "DOLLARDE",
    DollarFr => "DOLLARFR",
    Duration => "DURATION",
    Earlier => "EARLIER",
    Earliest => "EARLIEST",
    EDate => "EDATE",
    Effect => "EFFECT",
    EndOfMonth => "ENDOFMONTH",
    EndOfQuarter => "ENDOFQUARTER",
    EndOfYear => "ENDOFYEAR",
    EoMonth => "EOMONTH",
    Error => "ERROR",
    EvaluateAndLog => "EVALUATEANDLOG",
    Even => "EVEN",
    Exact => "EXACT",
    Except => "EXCEPT",
    Exp => "EXP",
    Expand => "EXPAND",
    ExpandAll => "EXPANDALL",
    ExponDist => "EXPON.DIST",
    Fact => "FACT",
    False => "FALSE",
    Filter => "FILTER",
    Filters => "FILTERS",
    Find => "FIND",
    First => "FIRST",
    FirstDate => "FIRSTDATE",
    FirstNonBlank => "FIRSTNONBLANK",
    FirstNonBlankValue => "FIRSTNONBLANKVALUE",
    Fixed => "FIXED",
    Floor => "FLOOR",
    Format => "FORMAT",
    Fv => "FV",
    Gcd => "GCD",
    Generate => "GENERATE",
    GenerateAll => "GENERATEALL",
    GenerateSeries => "GENERATESERIES",
    GeoMean => "GEOMEAN",
    GeoMeanX => "GEOMEANX",
    GroupBy => "GROUPBY",
    HasOneFilter => "HASONEFILTER",
    HasOneValue => "HASONEVALUE",
    Hour => "HOUR",
    If => "IF",
    IfEager => "IF.EAGER",
    IfError => "IFERROR",
    Ignore => "IGNORE",
    Index => "INDEX",
    Int => "INT",
    Intersect => "INTERSECT",
    IntRate => "INTRATE",
    Ipmt => "IPMT",
    IsAfter => "ISAFTER",
    IsBlank => "ISBLANK",
    IsCrossFiltered => "ISCROSSFILTERED",
    IsEmpty => "ISEMPTY",
    IsError => "ISERROR",
    IsEven => "ISEVEN",
    IsFiltered => "ISFILTERED",
    IsInScope => "ISINSCOPE",
    IsLogical => "ISLOGICAL",
    IsNonText => "ISNONTEXT",
    IsNumber => "ISNUMBER",
    IsoCeiling => "ISO.CEILING",
    IsOdd => "ISODD",
    IsOnOrAfter => "ISONORAFTER",
    IsPmt => "ISPMT",
    IsSelectedMeasure => "ISSELECTEDMEASURE",
    IsSubtotal => "ISSUBTOTAL",
    IsText => "ISTEXT",
    KeepFilters => "KEEPFILTERS",
    Last => "LAST",
    LastDate => "LASTDATE",
    LastNonBlank => "LASTNONBLANK",
    LastNonBlankValue => "LASTNONBLANKVALUE",
    Lcm => "LCM",
    Left => "LEFT",
    Len => "LEN",
    Linest => "LINEST",
    LinestX => "LINESTX",
    Ln => "LN",
    Log => "LOG",
    Log10 => "LOG10",
    Lookup => "LOOKUP",
    LookupValue => "LOOKUPVALUE",
    LookupWithTotals => "LOOKUPWITHTOTALS",
    Lower => "LOWER",
    MatchBy => "MATCHBY",
    Max => "MAX",
    MaxA => "MAXA",
    MaxX => "MAXX",
    MDuration => "MDURATION",
    Median => "MEDIAN",
    MedianX => "MEDIANX",
    Mid => "MID",
    Min => "MIN",
    MinA => "MINA",
    Minute => "MINUTE",
    MinX => "MINX",
    Mod => "MOD",
    Month => "MONTH",
    MovingAverage => "MOVINGAVERAGE",
    MRound => "MROUND",
    NameOf => "NAMEOF",
    NaturalInnerJoin => "NATURALINNERJOIN",
    NaturalLeftOuterJoin => "NATURALLEFTOUTERJOIN",
    NetworkDays => "NETWORKDAYS",
    Next => "NEXT",
    NextDay => "NEXTDAY",
    NextMonth => "NEXTMONTH",
    NextQuarter => "NEXTQUARTER",
    NextYear => "NEXTYEAR",
    Nominal => "NOMINAL",
    NonVisual => "NONVISUAL",
    NormDist => "NORM.DIST",
    NormInv => "NORM.INV",
    NormSDist => "NORM.S.DIST",
    NormSInv => "NORM.S.INV",
    Now => "NOW",
    Nper => "NPER",
    Odd => "ODD",
    OddFPrice => "ODDFPRICE",
    OddFYield => "ODDFYIELD",
    OddLPrice => "ODDLPRICE",
    OddLYield => "ODDLYIELD",
    Offset => "OFFSET",
    OpeningBalanceMonth => "OPENINGBALANCEMONTH",
    OpeningBalanceQuarter => "OPENINGBALANCEQUARTER",
    OpeningBalanceYear => "OPENINGBALANCEYEAR",
    Or => "OR",
    OrderBy => "ORDERBY",
    ParallelPeriod => "PARALLELPERIOD",
    PartitionBy => "PARTITIONBY",
    Path => "PATH",
    PathContains => "PATHCONTAINS",
    PathItem => "PATHITEM",
    PathItemReverse => "PATHITEMREVERSE",
    PathLength => "PATHLENGTH",
    PDuration => "PDURATION",
    PercentileExc => "PERCENTILE.EXC",
    PercentileInc => "PERCENTILE.INC",
    PercentileXExc => "PERCENTILEX.EXC",
    PercentileXInc => "PERCENTILEX.INC",
    Permut => "PERMUT",
    Pi => "PI",
    Pmt => "PMT",
    PoissonDist => "POISSON.DIST",
    Power => "POWER",
    Ppmt => "PPMT",
    Previous => "PREVIOUS",
    PreviousDay => "PREVIOUSDAY",
    PreviousMonth => "PREVIOUSMONTH",
    PreviousQuarter => "PREVIOUSQUARTER",
    PreviousYear => "PREVIOUSYEAR",
    Price => "PRICE",
    PriceDisc => "PRICEDISC",
    PriceMat => "PRICEMAT",
    Product => "PRODUCT",
    ProductX => "PRODUCTX",
    Pv => "PV",
    Quarter => "QUARTER",
    Quotient => "QUOTIENT",
    Radians => "RADIANS",
    Rand => "RAND",
    RandBetween => "RANDBETWEEN",
    Range => "RANGE",
    Rank => "RANK",
    RankEq => "RANK.EQ",
    RankX => "RANKX",
    Rate => "RATE",
    Received => "RECEIVED",
    Related => "RELATED",
    RelatedTable => "RELATEDTABLE",
    RemoveFilters => "REMOVEFILTERS",
    Replace => "REPLACE",
    Rept => "REPT",
    Right => "RIGHT",
    Rollup => "ROLLUP",
    RollupAddIsSubtotal => "ROLLUPADDISSUBTOTAL",
    RollupGroup => "ROLLUPGROUP",
    RollupIsSubtotal => "ROLLUPISSUBTOTAL",
    Round => "ROUND",
    RoundDown => "ROUNDDOWN",
    RoundUp => "ROUNDUP",
    Row => "ROW",
    RowNumber => "ROWNUMBER",
    Rri => "RRI",
    RunningSum => "RUNNINGSUM",
    SamePeriodLastYear => "SAMEPERIODLASTYEAR",
    Sample => "SAMPLE",
    Search => "SEARCH",
    Second => "SECOND",
    SelectColumns => "SELECTCOLUMNS",
    SelectedMeasure => "SELECTEDMEASURE",
    SelectedMeasureFormatString => "SELECTEDMEASUREFORMATSTRING",
    SelectedMeasureName => "SELECTEDMEASURENAME",
    SelectedValue => "SELECTEDVALUE",
    Sign => "SIGN",
    Sin => "SIN",
    Sinh => "SINH",
    Sln => "SLN",
    Sqrt => "SQRT",
    SqrtPi => "SQRTPI",
    StartOfMonth => "STARTOFMONTH",
    StartOfQuarter => "STARTOFQUARTER",
    StartOfYear => "STARTOFYEAR",
    StDevP => "STDEV.P",
    StDevS => "STDEV.S",
    StDevXP => "STDEVX.P",
    StDevXS => "STDEVX.S",
    Substitute => "SUBSTITUTE",
    SubstituteWithIndex => "SUBSTITUTEWITHINDEX",
    Sum => "SUM",
    Summarize => "SUMMARIZE",
    SummarizeColumns => "SUMMARIZECOLUMNS",
    SumX => "SUMX",
    Switch => "SWITCH",
    Syd => "SYD",
    TDist => "T.DIST",
    TDist2T => "T.DIST.2T",
    TDistRt => "T.DIST.RT",
    TInv => "T.INV",
    TInv2T => "T.INV.2T",
    Tan => "TAN",
    Tanh => "TANH",
    TBillEq => "TBILLEQ",
    TBillPrice => "TBILLPRICE",
    TBillYield => "TBILLYIELD",
    Time => "TIME",
    TimeValue => "TIMEVALUE",
    ToCsv => "TOCSV",
    Today => "TODAY",
    ToJson => "TOJSON",
    TopN => "TOPN",
    TopNSkip => "TOPNSKIP",
    TotalMtd => "TOTALMTD",
    TotalQtd => "TOTALQTD",
    TotalYtd => "TOTALYTD",
    TreatAs => "TREATAS",
    Trim => "TRIM",
    True => "TRUE",
    Trunc => "TRUNC",
    Unichar => "UNICHAR",
    Unicode => "UNICODE",
    Union => "UNION",
    Upper => "UPPER",
    UserCulture => "USERCULTURE",
    UseRelationship => "USERELATIONSHIP",
    UserName => "USERNAME",
    UserObjectId => "USEROBJECTID",
    UserPrincipalName => "USERPRINCIPALNAME",
    UtcNow => "UTCNOW",
    UtcToday => "UTCTODAY",
    Value => "VALUE",
    Values => "VALUES",
    VarP => "VAR.P",
    VarS => "VAR.S",
    VarXP => "VARX.P",
    VarXS => "VARX.S",
    Vdb => "VDB",
    Weekday => "WEEKDAY",
    WeekNum => "WEEKNUM",
    Window => "WINDOW",
    Xirr => "XIRR",
    Xnpv => "XNPV",
    Year => "YEAR",
    YearFrac => "YEARFRAC",
    Yield => "YIELD",
    YieldDisc => "YIELDDISC",
    YieldMat => "YIELDMAT",
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Run of whitespace.
    Whitespace,
    /// `// ...` or `-- ...` up to, not including, the line break.
    SingleLineComment,
    /// `/* ... */`.
    DelimitedComment,

    /// Quoted table name: `'Dim Date'`.
    Table,
    /// Bare identifier that may be a table, a variable or a user function.
    TableOrVariable,
    /// Bracketed column or measure name: `[Total Sales]`.
    ColumnOrMeasure,

    /// `"text"`.
    StringLiteral,
    /// `42`.
    IntegerLiteral,
    /// `4.2`, `.5`, `1e3`.
    RealLiteral,

    /// Call of a built-in function.
    Function(Builtin),

    /// `VAR`
    Var,
    /// `RETURN`
    Return,
    /// `DEFINE`
    Define,
    /// `EVALUATE`
    Evaluate,
    /// `MEASURE`
    Measure,
    /// `NOT`
    Not,
    /// `IN`
    In,
    /// `ORDER`
    Order,
    /// `BY`
    By,
    /// `ASC`
    Asc,
    /// `DESC`
    Desc,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Div,
    /// `^`
    Caret,
    /// `&`
    Ampersand,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `=`, both comparison and assignment.
    Equals,
    /// `==`
    StrictEquals,
    /// `<>`
    NotEquals,
    /// `<`
    Less,
    /// `<=`
    LessEquals,
    /// `>`
    Greater,
    /// `>=`
    GreaterEquals,
    /// `=>`
    Arrow,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `(`
    OpenParens,
    /// `)`
    CloseParens,
    /// `{`
    OpenCurly,
    /// `}`
    CloseCurly,

    /// Character the lexer does not recognize.
    Unknown,
}

impl TokenKind {
    /// Channel the lexer assigns to this kind.
    #[must_use]
    pub fn channel(self) -> Channel {
        match self {
            Self::Whitespace => Channel::Hidden,
            Self::SingleLineComment | Self::DelimitedComment => Channel::Comment,
            Self::Var | Self::Return | Self::Define | Self::Evaluate | Self::Measure => {
                Channel::Keyword
            }
            _ => Channel::Code,
        }
    }

    /// Returns true for the identifier classes that name tables or variables.
    #[must_use]
    pub fn is_identifier(self) -> bool {
        matches!(self, Self::Table | Self::TableOrVariable)
    }

    /// Returns true for integer and real literals.
    #[must_use]
    pub fn is_numeric_literal(self) -> bool {
        matches!(self, Self::IntegerLiteral | Self::RealLiteral)
    }

    /// Returns the built-in function, if this is a function token.
    #[must_use]
    pub fn builtin(self) -> Option<Builtin> {
        match self {
            Self::Function(builtin) => Some(builtin),
            _ => None,
        }
    }
}

/// A single lexed token.
///
/// Offsets are byte offsets into the source: `start` is inclusive, `stop` is
/// exclusive. `index` is the token's position in the full stream and serves
/// as its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Lexical class.
    pub kind: TokenKind,
    /// Exact source text.
    pub text: String,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub stop: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
    /// Channel the token travels on.
    pub channel: Channel,
    /// Position in the token stream.
    pub index: usize,
}

impl Token {
    /// Returns true if the token is on the code channel.
    #[must_use]
    pub fn is_code(&self) -> bool {
        self.channel == Channel::Code
    }

    /// Returns true if the token is on the comment channel.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.channel == Channel::Comment
    }

    /// Returns true if the token is a call of `builtin`.
    #[must_use]
    pub fn is_builtin(&self, builtin: Builtin) -> bool {
        self.kind == TokenKind::Function(builtin)
    }

    /// Length of the token in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Returns true for zero-length tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// Returns true if both values denote the same stream position.
    #[must_use]
    pub fn same_as(&self, other: &Token) -> bool {
        self.index == other.index
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Token(Kind: {:?}, Text: '{}', Line: {}, Column: {}, Start: {}, Stop: {})",
            self.kind, self.text, self.line, self.column, self.start, self.stop
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_ignores_case() {
        assert_eq!(Builtin::from_name("calculate"), Some(Builtin::Calculate));
        assert_eq!(Builtin::from_name("IfError"), Some(Builtin::IfError));
        assert_eq!(Builtin::from_name("MyUDF"), None);
    }

    #[test]
    fn keywords_travel_on_keyword_channel() {
        assert_eq!(TokenKind::Var.channel(), Channel::Keyword);
        assert_eq!(TokenKind::Return.channel(), Channel::Keyword);
        assert_eq!(TokenKind::Not.channel(), Channel::Code);
        assert_eq!(TokenKind::Whitespace.channel(), Channel::Hidden);
        assert_eq!(TokenKind::DelimitedComment.channel(), Channel::Comment);
    }

    #[test]
    fn identifier_classes() {
        assert!(TokenKind::Table.is_identifier());
        assert!(TokenKind::TableOrVariable.is_identifier());
        assert!(!TokenKind::ColumnOrMeasure.is_identifier());
        assert!(!TokenKind::Function(Builtin::Sum).is_identifier());
    }
}
