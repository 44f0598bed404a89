/// The xtask binary delegates entirely to nih_plug_xtask, which provides
/// the `bundle` subcommand. Usage:
///
///   cargo xtask bundle loveless-flanger --release
///
/// This compiles the plugin as a cdylib and packages it into CLAP and
/// VST3 bundles at `target/bundled/Loveless Flanger.*`.
fn main() -> nih_plug_xtask::Result<()> {
    nih_plug_xtask::main()
}
