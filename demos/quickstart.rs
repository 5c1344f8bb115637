use dtms::{Instant, Interval, Settings};

fn main() -> dtms::Result<()> {
    let settings = Settings::from_name("Europe/Madrid")?;
    let now = Instant::now_with(&settings);
    println!("now (UTC):    {now}");
    println!("now (local):  {}", now.format("Y-m-d H:i:s.u T"));
    println!("fraction:     {}", now.fraction());

    let mut deadline = now.clone();
    deadline.modify("+1 day +2 hours +250000 micro")?;
    deadline.add(&Interval::parse("PT0.999999S")?)?;
    println!("deadline:     {deadline}");

    let remaining = now.diff(&deadline, false)?;
    println!("remaining:    {}", remaining.format("%RP%dDT%hH%iM%sS"));
    println!("as ISO-8601:  {remaining}");
    Ok(())
}
