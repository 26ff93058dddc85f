//! Turn the GlyphLayer-* layers of an Inkscape drawing into an SVG font.

use layers2font::core;

fn main() {
    let cli_args = core::platform::get_cli_args();
    if let Err(error) = core::run_app(cli_args) {
        core::platform::handle_error(error);
    }
}
