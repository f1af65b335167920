/// Static findings shown under the charts, independent of the selection.
pub const INSIGHTS: [(&str, &str); 4] = [
    (
        "Economic Growth",
        "Global GDP shows a consistent upward trajectory, though specific countries experience volatility.",
    ),
    (
        "Climate",
        "CO2 emissions are highly concentrated in the top 10 emitting nations.",
    ),
    (
        "Infrastructure",
        "A strong negative correlation exists between rural population size and electricity access in developing nations.",
    ),
    (
        "Health & Wealth",
        "Life expectancy strongly correlates with GDP per capita, but the relationship follows a logarithmic curve (diminishing returns).",
    ),
];
