use clap::Parser;

/// Projects the winner of every riding under a national swing and colours an SVG map.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the run: sources, parties, colours, weights
    /// and targets. The options below override the values from this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default results.txt) The table of historical results, one riding per line.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default text) The type of the input: text or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first sheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path, default CMHoCToronto.svg) The SVG map. Every element with a data-riding
    /// attribute is coloured.
    #[clap(short, long, value_parser)]
    pub map: Option<String>,

    /// (path pattern, default CMHoCToronto_Map{year}.svg) Where to write the coloured maps.
    /// {year} is replaced by the year index, or by 'blended'.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (year index, repeatable, default 0) The years to project. 0 is the most recent year.
    #[clap(short, long, value_parser)]
    pub year: Option<Vec<usize>>,

    /// (CODE=PERCENT, repeatable) The national target of a party, for example LPC=40.
    /// If no target is given, the program asks for them.
    #[clap(short, long, value_parser)]
    pub target: Option<Vec<String>>,

    /// Combine all the selected years with the year weights into a single map.
    #[clap(long, takes_value = false)]
    pub blend: bool,

    /// Write the map once at the end instead of after every riding element.
    #[clap(long, takes_value = false)]
    pub single_write: bool,

    /// (file path, 'stdout' or empty) If specified, a JSON summary of the projected winners is
    /// written to the given location.
    #[clap(long, value_parser)]
    pub out_summary: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, the program checks that the
    /// computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
