mod output;

pub use output::{
    load_series,
    render_module,
    save_module,
    save_raw_json,
    OutputPaths,
};
