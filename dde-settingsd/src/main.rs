fn main() -> anyhow::Result<()> {
    dde_settingsd::run()
}
