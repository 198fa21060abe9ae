use clap::CommandFactory;

#[allow(dead_code)]
#[path = "src/cli.rs"]
mod cli;

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let out_dir =
        std::path::PathBuf::from(std::env::var_os("OUT_DIR").ok_or(std::io::ErrorKind::NotFound)?);
    let cmd = cli::Cli::command();

    let man = clap_mangen::Man::new(cmd.clone());
    let mut buffer: Vec<u8> = Default::default();
    man.render(&mut buffer)?;
    std::fs::write(out_dir.join("pdfstitch.1"), buffer)?;

    // One page per action, e.g. pdfstitch-merge.1
    for subcommand in cmd.get_subcommands() {
        let name = format!("pdfstitch-{}", subcommand.get_name());
        let mut buffer: Vec<u8> = Default::default();
        clap_mangen::Man::new(subcommand.clone().name(name.clone())).render(&mut buffer)?;
        std::fs::write(out_dir.join(format!("{name}.1")), buffer)?;
    }

    Ok(())
}
